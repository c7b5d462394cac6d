//! 既定パスの解決

use std::path::PathBuf;

/// データディレクトリ（実行ログの置き場）。
/// WP_DATA_DIR で明示上書き、WindowsではProgramData配下、それ以外は一時領域。
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WP_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(program_data) = std::env::var("ProgramData") {
        return PathBuf::from(program_data).join("Watchpost");
    }
    std::env::temp_dir().join("watchpost")
}
