use serde_json::json;

use crate::cli::OutputFormat;
use crate::middleware::route_matcher::{classify, is_api_path};

pub fn handle(path: &str, output_format: OutputFormat) {
    let class = classify(path);
    let api = is_api_path(path);

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "path": path, "class": format!("{:?}", class).to_lowercase(), "api": api })
        ),
        OutputFormat::Text => println!("{} -> {:?}{}", path, class, if api { " (api)" } else { "" }),
    }
}
