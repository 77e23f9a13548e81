use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;

fn parse_line(line: &str) -> Option<(String, String)> {
    let s = line.trim();
    if s.is_empty() || s.starts_with('#') {
        return None;
    }
    let (key, raw) = s.split_once('=')?;
    let mut val = raw.trim();
    // Strip one layer of surrounding quotes
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        val = &val[1..val.len() - 1];
    }
    Some((key.trim().to_string(), val.to_string()))
}

/// Read key/value pairs from `.env` in the current working directory.
/// Missing file is not an error; malformed lines are skipped with a warning.
pub fn parse_env_file() -> Result<HashMap<String, String>> {
    let path = Path::new(".env");
    let mut map = HashMap::new();
    if !path.exists() {
        return Ok(map);
    }
    for (idx, line) in fs::read_to_string(path)?.lines().enumerate() {
        match parse_line(line) {
            Some((k, v)) => {
                map.insert(k, v);
            }
            None if !line.trim().is_empty() && !line.trim_start().starts_with('#') => {
                log::warn!("Ignoring .env line {} without '=': {}", idx + 1, line);
            }
            None => {}
        }
    }
    Ok(map)
}

/// Load `.env` into the process environment. Variables already set in the
/// environment win over the file.
pub fn load_dotenv_if_present() -> Result<()> {
    for (k, v) in parse_env_file()? {
        if std::env::var_os(&k).is_none() {
            unsafe {
                std::env::set_var(&k, &v);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_quoted_values() {
        assert_eq!(
            parse_line("DB_HOST=127.0.0.1"),
            Some(("DB_HOST".into(), "127.0.0.1".into()))
        );
        assert_eq!(
            parse_line("DB_PASSWORD=\"s3cr=et\""),
            Some(("DB_PASSWORD".into(), "s3cr=et".into()))
        );
        assert_eq!(
            parse_line("  DB_NAME = 'landdb' "),
            Some(("DB_NAME".into(), "landdb".into()))
        );
    }

    #[test]
    fn skips_comments_blanks_and_malformed_lines() {
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("NOEQUALS"), None);
    }
}
