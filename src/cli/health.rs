//! One-off connectivity check.

use std::error::Error;
use std::process::ExitCode;

use crate::api::{build_client, HealthReport};
use crate::core::dispatch::Timeouts;
use crate::core::health::{probe, read_report};

pub async fn run_health(endpoint: &str) -> Result<ExitCode, Box<dyn Error>> {
    let client = build_client()?;
    let timeout = Timeouts::default().health_probe;
    match probe(&client, endpoint, timeout).await {
        Ok(response) => {
            let report = read_report(response, timeout).await;
            println!("{}", describe_online(report.as_ref()));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("● Connection Issue ({err})");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn describe_online(report: Option<&HealthReport>) -> String {
    let mut line = "● IBM Granite Online".to_string();
    let Some(report) = report else {
        return line;
    };
    let details: Vec<&str> = [&report.service, &report.model, &report.status]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .filter(|field| !field.trim().is_empty())
        .collect();
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}
