use clap::Parser;
use serde::Serialize;
use std::path::Path;

mod output;

use schemafix::defaults::{stock_fixes, SCHEMA_PATH};
use schemafix::log_status;
use schemafix::relations::{fix_schema_file, FixOutcome};
use schemafix::Result;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "schemafix")]
#[command(version = VERSION)]
#[command(about = "Repairs relation field names in the Prisma schema")]
struct Cli {}

#[derive(Serialize)]
struct FixOutput {
    command: String,
    schema_path: String,
    message: String,
    fixes: Vec<FixOutcome>,
    total_replacements: usize,
    bytes_written: usize,
}

fn run_fix() -> Result<FixOutput> {
    let fixes = stock_fixes();

    log_status!("fix", "Rewriting {}", SCHEMA_PATH);

    let report = fix_schema_file(Path::new(SCHEMA_PATH), &fixes)?;
    let message = confirmation_line(&report.fixes);

    log_status!("fix", "{}", message);

    Ok(FixOutput {
        command: "fix.relations".to_string(),
        schema_path: report.schema_path,
        message,
        fixes: report.fixes,
        total_replacements: report.total_replacements,
        bytes_written: report.bytes_written,
    })
}

/// Confirmation line for the applied fixes, e.g.
/// "Fixed Post and Page author relations".
///
/// Emitted whenever the schema was rewritten, whether or not anything
/// matched: a no-op rewrite still leaves the schema in the fixed state.
fn confirmation_line(fixes: &[FixOutcome]) -> String {
    let models: Vec<&str> = fixes.iter().map(|f| f.model.as_str()).collect();

    let joined = match models.as_slice() {
        [] => return "Schema unchanged".to_string(),
        [one] => one.to_string(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    };

    // All stock fixes share one target name.
    format!("Fixed {} {} relations", joined, fixes[0].renamed_to)
}

fn main() -> std::process::ExitCode {
    let _cli = Cli::parse();

    let result = run_fix();

    let exit_code = match &result {
        Ok(_) => 0,
        Err(err) => output::exit_code_for_error(err.code),
    };

    if output::print_result(result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(model: &str) -> FixOutcome {
        FixOutcome {
            model: model.to_string(),
            field: "user".to_string(),
            renamed_to: "author".to_string(),
            replacements: 1,
        }
    }

    #[test]
    fn test_confirmation_line_for_stock_fixes() {
        let fixes = vec![outcome("Post"), outcome("Page")];
        assert_eq!(
            confirmation_line(&fixes),
            "Fixed Post and Page author relations"
        );
    }

    #[test]
    fn test_confirmation_line_for_single_fix() {
        let fixes = vec![outcome("Post")];
        assert_eq!(confirmation_line(&fixes), "Fixed Post author relations");
    }

    #[test]
    fn test_confirmation_line_for_three_fixes() {
        let fixes = vec![outcome("Post"), outcome("Page"), outcome("Comment")];
        assert_eq!(
            confirmation_line(&fixes),
            "Fixed Post, Page and Comment author relations"
        );
    }

    #[test]
    fn test_exit_code_clamping() {
        assert_eq!(exit_code_to_u8(0), 0);
        assert_eq!(exit_code_to_u8(-1), 0);
        assert_eq!(exit_code_to_u8(2), 2);
        assert_eq!(exit_code_to_u8(300), 255);
    }
}
