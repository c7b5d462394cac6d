//! wp-cli: コンポーネント開発用CLI。ローカル実行（環境変数注入・添付・
//! stdout/stderrキャプチャ）と出力プロトコル検証を行う。

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use wp_composition::domain::model::exit_codes::VALIDATION_FAILED;
use wp_composition::domain::model::markers::DEFAULT_OUTPUT_VAR;
use wp_composition::domain::service::validate_service::validate_monitor_output;
use wp_composition::error::{err, Result};
use wp_composition::harness::{run_component, HarnessOptions, HarnessReport};

macro_rules! bail {
    ($($t:tt)*) => {
        return Err(err(format!($($t)*)));
    };
}

#[derive(Parser, Debug)]
#[command(name = "wp-cli", about = "Watchpost component development CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// コンポーネントをローカル実行し、stdout/stderrをキャプチャする
    Run {
        /// 実行するコンポーネント（.ps1 / .sh / ネイティブ実行ファイル）
        #[arg(long)]
        script: PathBuf,
        /// KEY=VALUE 形式の変数ファイルを環境へ注入
        #[arg(long)]
        vars: Option<PathBuf>,
        /// 作業ディレクトリ（未指定なら一時ディレクトリ）
        #[arg(long)]
        workdir: Option<PathBuf>,
        /// 添付ファイルとして作業ディレクトリへコピーするディレクトリ
        #[arg(long)]
        attachments: Option<PathBuf>,
        /// モニター出力のマーカー/結果行を検証
        #[arg(long, default_value_t = false)]
        validate_monitor: bool,
        /// モニターの出力変数名
        #[arg(long, default_value = DEFAULT_OUTPUT_VAR)]
        output_var: String,
        /// JSON形式で出力
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// キャプチャ済み出力のマーカー/結果行を検証する
    Validate {
        /// 検証するファイル。'-' で標準入力
        #[arg(long)]
        input: String,
        /// モニターの出力変数名
        #[arg(long, default_value = DEFAULT_OUTPUT_VAR)]
        output_var: String,
        /// JSON形式で出力
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("wp-cli failed: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            script,
            vars,
            workdir,
            attachments,
            validate_monitor,
            output_var,
            json,
        } => {
            let options = HarnessOptions {
                script,
                vars_file: vars,
                workdir,
                attachments,
                validate_monitor,
                output_var,
            };
            let report = run_component(&options).map_err(|e| err(e.to_string()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&map_run_report(&report))?);
            } else {
                print_run_report(&report);
            }
            Ok(report.harness_exit_code())
        }

        Command::Validate {
            input,
            output_var,
            json,
        } => {
            let (text, source) = read_input(&input)?;
            let validation = validate_monitor_output(&text, &output_var);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonValidation {
                        ok: validation.ok(),
                        errors: validation.errors.clone(),
                    })?
                );
            } else if validation.ok() {
                println!("OK: Monitor output is valid ({})", source);
            } else {
                eprintln!("INVALID: Monitor output failed validation ({})", source);
                for error in &validation.errors {
                    eprintln!("- {}", error);
                }
            }
            Ok(if validation.ok() { 0 } else { VALIDATION_FAILED })
        }
    }
}

fn read_input(input: &str) -> Result<(String, String)> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok((text, "<stdin>".to_string()));
    }
    let path = PathBuf::from(input);
    if !path.is_file() {
        bail!("--input not found: {}", path.display());
    }
    let bytes = std::fs::read(&path)?;
    Ok((
        String::from_utf8_lossy(&bytes).to_string(),
        path.display().to_string(),
    ))
}

fn print_run_report(report: &HarnessReport) {
    println!("Workdir:   {}", report.workdir.display());
    println!("Exit code: {}", report.exit_code);
    println!("Stdout:    {}", report.stdout_path.display());
    println!("Stderr:    {}", report.stderr_path.display());
    println!("Runtime:   {} ms", report.duration_ms);
    if let Some(status_line) = &report.status_line {
        println!("Status:    {}", status_line);
    }
    match &report.validation {
        Some(validation) if validation.ok() => {
            println!("Monitor output: OK");
        }
        Some(validation) => {
            eprintln!("Monitor output: INVALID");
            for error in &validation.errors {
                eprintln!("- {}", error);
            }
        }
        None => {}
    }
}

// JSON出力用構造体（CLIプレゼンテーション層専用）

#[derive(Serialize)]
struct JsonRunReport {
    exit_code: i32,
    harness_exit_code: i32,
    workdir: String,
    stdout: String,
    stderr: String,
    status_line: Option<String>,
    output_valid: Option<bool>,
    validation_errors: Vec<String>,
    duration_ms: u64,
}

#[derive(Serialize)]
struct JsonValidation {
    ok: bool,
    errors: Vec<String>,
}

fn map_run_report(report: &HarnessReport) -> JsonRunReport {
    JsonRunReport {
        exit_code: report.exit_code,
        harness_exit_code: report.harness_exit_code(),
        workdir: report.workdir.display().to_string(),
        stdout: report.stdout_path.display().to_string(),
        stderr: report.stderr_path.display().to_string(),
        status_line: report.status_line.clone(),
        output_valid: report.validation.as_ref().map(|v| v.ok()),
        validation_errors: report
            .validation
            .as_ref()
            .map(|v| v.errors.clone())
            .unwrap_or_default(),
        duration_ms: report.duration_ms as u64,
    }
}
