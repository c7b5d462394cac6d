//! wp-monitor: ソフトウェア検出モニターコンポーネント。
//! パラメータはホストが注入した環境変数から解決し、ホストへ見せるのは
//! 結果マーカーと終了コード（0=正常 / 非0=アラート）のみ。

use wp_composition::domain::model::exit_codes::ALERT;
use wp_composition::ComponentRuntime;

fn main() {
    wp_log_utils::write_lifecycle_line("wp-monitor", "start");
    let runtime = ComponentRuntime::new();
    let code = match runtime.run_detection_monitor() {
        Ok(run) => {
            wp_log_utils::write_lifecycle_line(
                "wp-monitor",
                &format!(
                    "done status={} exit={} runtime={}ms",
                    run.outcome.status().as_prefix(),
                    run.exit_code,
                    run.duration_ms
                ),
            );
            run.exit_code
        }
        Err(err) => {
            // 出力ストリーム自体が書けない場合のみここへ来る
            eprintln!("wp-monitor failed: {err}");
            wp_log_utils::write_lifecycle_line("wp-monitor", &format!("failed: {err}"));
            ALERT
        }
    };
    std::process::exit(code);
}
