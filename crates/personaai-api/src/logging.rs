use colored::Colorize;

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let trunc_chars = if max_chars >= 3 { max_chars - 3 } else { 0 };
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Log outbound request details for debugging (console output).
/// The key is shown only as a short prefix.
pub fn log_request(url: &str, body: &serde_json::Value, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    println!("{}: {}", "URL".bright_yellow(), url);
    println!(
        "{}: {}***",
        "Key".bright_yellow(),
        api_key.chars().take(8).collect::<String>()
    );

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(body) {
        Ok(json) => {
            if json.chars().count() > 5000 {
                println!("{}", safe_truncate(&json, 5000));
                println!(
                    "\n{}",
                    format!("... (truncated, total {} bytes)", json.len()).bright_black()
                );
            } else {
                println!("{}", json);
            }
        }
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log a non-success provider response (console output)
pub fn log_response_error(status: &reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_red());
    println!("{}", "❌ HTTP RESPONSE ERROR".bright_red().bold());
    println!("{}: {}", "Status".bright_yellow(), status);
    println!("{}", safe_truncate(body, 2000));
    println!("{}", "═".repeat(80).bright_red());
}

/// Log one raw line of a streaming response (console output)
pub fn log_stream_chunk(counter: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }
    println!(
        "{} {}",
        format!("📦 chunk #{}:", counter).bright_black(),
        safe_truncate(data.trim_end(), 200).bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_truncate_leaves_short_strings_alone() {
        assert_eq!(safe_truncate("Hello world", 100), "Hello world");
    }

    #[test]
    fn safe_truncate_appends_ellipsis() {
        let long_text = "x".repeat(1000);
        let truncated = safe_truncate(&long_text, 100);
        assert_eq!(truncated.len(), 100);
        assert!(truncated.ends_with("..."));
    }
}
