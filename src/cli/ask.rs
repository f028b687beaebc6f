use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::llm::{factory, generate, prompts};

/// One prompt, one answer on stdout. A failed remote call exits non-zero.
pub async fn run(config: &Config, function_type: &str, style: &str, query: &str) -> Result<()> {
    let client = factory::create_client(config)?;

    if !prompts::is_known_style(function_type, style) {
        warn!(
            "No template for {}/{}; sending the generic prompt",
            function_type, style
        );
    }

    let prompt = prompts::resolve(function_type, style, query);
    let generation = generate(client.as_ref(), &prompt).await;
    info!("Remote call took {:.2}s", generation.processing_time);

    match generation.outcome {
        Ok(content) => {
            println!("{}", content);
            Ok(())
        }
        Err(err) => bail!("{}", err),
    }
}
