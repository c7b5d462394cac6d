//! wp-deploy: アプリケーション配布コンポーネント。
//! 作業ディレクトリへ添付されたインストーラを同期実行し、終了コードで
//! 成功/再起動待ち/失敗をホストへ報告する（0 / 3010 / 1641 / その他）。

use wp_composition::ComponentRuntime;

fn main() {
    wp_log_utils::write_lifecycle_line("wp-deploy", "start");
    let runtime = ComponentRuntime::new();
    let code = match runtime.run_deploy() {
        Ok(report) => {
            println!("{}", report.detail);
            println!("Outcome: {}", report.outcome.label());
            wp_log_utils::write_lifecycle_line(
                "wp-deploy",
                &format!(
                    "done outcome={} exit={}",
                    report.outcome.label(),
                    report.process_exit_code()
                ),
            );
            report.process_exit_code()
        }
        Err(err) => {
            eprintln!("wp-deploy failed: {err}");
            wp_log_utils::write_lifecycle_line("wp-deploy", &format!("failed: {err}"));
            1
        }
    };
    std::process::exit(code);
}
