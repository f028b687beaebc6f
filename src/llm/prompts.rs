// Prompt template catalog: function type -> style -> template.
//
// Lookup never fails. An unknown function type or style degrades to
// FALLBACK_TEMPLATE; callers that need to reject bad input check
// `is_known_style` against the same tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The single substitution point in every template.
pub const PLACEHOLDER: &str = "{query}";

pub const FALLBACK_TEMPLATE: &str = "Please help me with the following: {query}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionType {
    QuestionAnswering,
    TextSummarization,
    CreativeGeneration,
}

impl FunctionType {
    pub const ALL: [FunctionType; 3] = [
        FunctionType::QuestionAnswering,
        FunctionType::TextSummarization,
        FunctionType::CreativeGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::QuestionAnswering => "question_answering",
            FunctionType::TextSummarization => "text_summarization",
            FunctionType::CreativeGeneration => "creative_generation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FunctionType::QuestionAnswering => "Question Answering",
            FunctionType::TextSummarization => "Text Summarization",
            FunctionType::CreativeGeneration => "Creative Generation",
        }
    }

    pub fn styles(&self) -> &'static [Style] {
        match self {
            FunctionType::QuestionAnswering => &QUESTION_ANSWERING,
            FunctionType::TextSummarization => &TEXT_SUMMARIZATION,
            FunctionType::CreativeGeneration => &CREATIVE_GENERATION,
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("\"{0}\" is not a valid choice.")]
pub struct UnknownFunctionType(pub String);

impl FromStr for FunctionType {
    type Err = UnknownFunctionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == s)
            .ok_or_else(|| UnknownFunctionType(s.to_string()))
    }
}

/// One selectable phrasing within a function type.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Style {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub template: &'static str,
}

static QUESTION_ANSWERING: [Style; 3] = [
    Style {
        id: "factual",
        name: "Factual & Direct",
        description: "Clear, direct answers with facts",
        template: r#"You are a knowledgeable research assistant with expertise across multiple domains.
When answering questions, provide accurate, well-structured information with clear explanations.

Question: {query}

Please provide a comprehensive answer that includes:
1. Direct answer to the question
2. Relevant context or background information
3. Any important related facts or considerations

Respond in a professional yet conversational tone."#,
    },
    Style {
        id: "analytical",
        name: "Analytical & Detailed",
        description: "In-depth analysis with reasoning",
        template: r#"You are an analytical expert who breaks down complex questions into digestible insights.

Query: {query}

Analyze this question and provide:
- Core facts and direct answers
- Supporting evidence or reasoning
- Multiple perspectives if applicable
- Practical implications or applications

Keep your response clear, logical, and well-organized."#,
    },
    Style {
        id: "educational",
        name: "Educational & Teaching",
        description: "Learning-focused explanations",
        template: r#"You are an educational mentor helping someone learn. Explain concepts clearly and thoroughly.

Student's Question: {query}

Provide an educational response that:
- Explains the concept from basics to advanced
- Uses examples and analogies where helpful
- Highlights key takeaways
- Suggests further learning directions if relevant

Make it engaging and easy to understand."#,
    },
];

static TEXT_SUMMARIZATION: [Style; 3] = [
    Style {
        id: "concise",
        name: "Concise Paragraph",
        description: "Brief, well-structured summary",
        template: r#"You are a professional content summarizer. Create clear, concise summaries that capture essential information.

Text to summarize: {query}

Provide a well-structured summary that includes:
- Main points and key arguments
- Important details and data
- Logical flow and conclusions

Keep it comprehensive yet concise, maintaining the original context and meaning."#,
    },
    Style {
        id: "bullet_points",
        name: "Bullet Points",
        description: "Key points in bullet format",
        template: r#"You are a content analyst specializing in bullet-point summaries for quick comprehension.

Content: {query}

Create a structured summary with:
• Key Points (3-5 main ideas)
• Important Details (supporting facts/data)
• Conclusions/Outcomes
• Action Items (if applicable)

Format in clear bullet points for easy scanning and understanding."#,
    },
    Style {
        id: "executive",
        name: "Executive Summary",
        description: "Business-focused summary",
        template: r#"You are an executive briefing specialist. Create summaries for decision-makers who need quick, actionable insights.

Document: {query}

Provide an executive summary with:
1. Executive Overview (2-3 sentences)
2. Key Findings
3. Strategic Implications
4. Recommended Actions

Focus on business impact and decision-relevant information."#,
    },
];

static CREATIVE_GENERATION: [Style; 3] = [
    Style {
        id: "storytelling",
        name: "Creative Storytelling",
        description: "Engaging narratives and stories",
        template: r#"You are a creative storytelling expert with a talent for engaging narratives.

Creative Brief: {query}

Create compelling content that includes:
- Rich, vivid descriptions
- Well-developed characters or concepts
- Engaging plot or structure
- Emotional resonance and impact

Make it creative, original, and captivating while staying true to the request."#,
    },
    Style {
        id: "professional",
        name: "Professional Content",
        description: "Business and formal writing",
        template: r#"You are a professional content creator skilled in various writing formats.

Content Request: {query}

Generate high-quality content with:
- Clear structure and organization
- Appropriate tone for the intended audience
- Compelling and informative content
- Professional polish and refinement

Ensure the content meets professional standards and serves its intended purpose."#,
    },
    Style {
        id: "innovative",
        name: "Innovative & Unique",
        description: "Creative and original approaches",
        template: r#"You are an innovative content strategist who creates unique, fresh perspectives.

Creative Challenge: {query}

Develop innovative content featuring:
- Original ideas and unique angles
- Creative problem-solving approaches
- Fresh perspectives on familiar topics
- Engaging and memorable presentation

Push creative boundaries while maintaining practical value."#,
    },
];

/// Exact two-level lookup. `None` on any miss.
pub fn lookup(function_type: &str, style: &str) -> Option<&'static Style> {
    let function_type = FunctionType::from_str(function_type).ok()?;
    function_type.styles().iter().find(|s| s.id == style)
}

/// Compose the prompt sent to the model.
///
/// The query is inserted verbatim: no escaping, no length limit. Placeholder
/// text inside the query itself is left alone.
pub fn resolve(function_type: &str, style: &str, query: &str) -> String {
    let template = lookup(function_type, style)
        .map(|s| s.template)
        .unwrap_or(FALLBACK_TEMPLATE);
    template.replacen(PLACEHOLDER, query, 1)
}

/// Styles offered for a function type; empty for unknown types.
pub fn available_styles(function_type: &str) -> &'static [Style] {
    FunctionType::from_str(function_type)
        .map(|ft| ft.styles())
        .unwrap_or(&[])
}

pub fn is_known_style(function_type: &str, style: &str) -> bool {
    lookup(function_type, style).is_some()
}
