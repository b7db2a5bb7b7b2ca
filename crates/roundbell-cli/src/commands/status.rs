use roundbell_core::AppConfig;
use serde_json::json;

use crate::common::open_app;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let app = open_app(&config)?;

    let status = json!({
        "settings": app.settings(),
        "timer": app.snapshot(),
        "stats": app.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
