use crate::browse::{FieldKey, NavigationPolicy};
use crate::cli::args::CliArgs;
use crate::output::OutputFormat;

pub fn parse_hidden_fields<S: AsRef<str>>(values: &[S]) -> Result<Vec<FieldKey>, String> {
    let mut out: Vec<FieldKey> = Vec::new();
    for raw in values {
        for item in crate::utils::parse_csv_list(raw.as_ref()) {
            let key: FieldKey = item.parse().map_err(|e| format!("invalid --hide: {e}"))?;
            if !out.contains(&key) {
                out.push(key);
            }
        }
    }
    Ok(out)
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.policy.as_deref() {
        if NavigationPolicy::parse(raw).is_none() {
            return Err(format!("invalid --policy '{raw}', expected wrap or clamp"));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --output-format '{raw}', expected text or json"));
        }
    }
    if let Some(raw) = args.url.as_deref() {
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --url '{raw}': {e}"))?;
    }
    parse_hidden_fields(&args.hide)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn hide_accepts_csv_and_repeats() {
        let fields = parse_hidden_fields(&["image,links", "image", "Quote"]).unwrap();
        assert_eq!(fields, vec![FieldKey::Image, FieldKey::Links, FieldKey::Quote]);
    }

    #[test]
    fn unknown_hide_field_is_rejected() {
        let args = CliArgs::parse_from(["introviewer", "--hide", "image,email"]);
        assert!(validate(&args).unwrap_err().contains("email"));
    }

    #[test]
    fn bad_policy_and_format_are_rejected() {
        let args = CliArgs::parse_from(["introviewer", "--policy", "bounce"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["introviewer", "-A", "xml"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["introviewer", "--mode", "roster", "-A", "json"]);
        assert!(validate(&args).is_ok());
    }
}
