//! Windowsアンインストールレジストリアダプター
//!
//! HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall を
//! 64bit/32bit(WOW6432Node) 両ビューで列挙する。ユーザースコープは
//! HKEY_USERS 配下のロード済みハイブを列挙し、SIDをdomain\username へ解決する。
//! 低速なソフトウェアインベントリAPIは使わず、レジストリを直接読む。

use wp_domain::error::DomainError;
use wp_domain::model::SoftwareRecord;
use wp_domain::port::driven::SoftwareInventory;

/// アンインストールサブツリー（HKLM/HKU共通）
pub const UNINSTALL_SUBTREE: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// SIDが解決できないハイブの所有者表記
pub const UNKNOWN_USER: &str = "Unknown User";

/// サービスアカウント・クラスハイブなど、走査対象外のハイブ名か
pub fn is_skippable_hive(name: &str) -> bool {
    matches!(name, ".DEFAULT" | "S-1-5-18" | "S-1-5-19" | "S-1-5-20")
        || name.ends_with("_Classes")
}

/// プラットフォーム中立のハンドル
#[cfg(windows)]
pub type RegistryInventory = WindowsRegistryInventory;
#[cfg(not(windows))]
pub type RegistryInventory = NonWindowsRegistryInventory;

#[cfg(windows)]
#[derive(Debug, Default)]
pub struct WindowsRegistryInventory;

#[cfg(windows)]
impl WindowsRegistryInventory {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl SoftwareInventory for WindowsRegistryInventory {
    fn system_records(&self) -> Result<Vec<SoftwareRecord>, DomainError> {
        Ok(windows_impl::system_records())
    }

    fn user_records(&self) -> Result<Vec<SoftwareRecord>, DomainError> {
        Ok(windows_impl::user_records())
    }
}

#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct NonWindowsRegistryInventory;

#[cfg(not(windows))]
impl NonWindowsRegistryInventory {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(windows))]
impl SoftwareInventory for NonWindowsRegistryInventory {
    fn system_records(&self) -> Result<Vec<SoftwareRecord>, DomainError> {
        Ok(Vec::new())
    }

    fn user_records(&self) -> Result<Vec<SoftwareRecord>, DomainError> {
        Ok(Vec::new())
    }
}

#[cfg(windows)]
mod windows_impl {
    use super::{is_skippable_hive, UNINSTALL_SUBTREE, UNKNOWN_USER};
    use wp_domain::model::{InstallScope, SoftwareRecord};

    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::Foundation::{
        LocalFree, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS, HLOCAL, PSID,
    };
    use windows::Win32::Security::Authorization::ConvertStringSidToSidW;
    use windows::Win32::Security::{LookupAccountSidW, SID_NAME_USE};
    use windows::Win32::System::Registry::{
        HKEY, HKEY_LOCAL_MACHINE, HKEY_USERS, KEY_ENUMERATE_SUB_KEYS, KEY_QUERY_VALUE,
        KEY_WOW64_32KEY, KEY_WOW64_64KEY, REG_SAM_FLAGS, RRF_RT_REG_EXPAND_SZ, RRF_RT_REG_SZ,
        RegCloseKey, RegEnumKeyExW, RegGetValueW, RegOpenKeyExW,
    };

    const KEY_READ_ENUM: REG_SAM_FLAGS = REG_SAM_FLAGS(KEY_QUERY_VALUE.0 | KEY_ENUMERATE_SUB_KEYS.0);

    struct RegKeyGuard(HKEY);
    impl Drop for RegKeyGuard {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }

    /// システム全体の両ビューを列挙する。
    /// 個別キーの読み取り失敗は「そのパスに一致なし」として握りつぶす。
    pub(super) fn system_records() -> Vec<SoftwareRecord> {
        let mut records = Vec::new();
        for view in [KEY_WOW64_64KEY, KEY_WOW64_32KEY] {
            let Some(key) = open_key(HKEY_LOCAL_MACHINE, UNINSTALL_SUBTREE, KEY_READ_ENUM | view)
            else {
                continue; // ビューが存在しない/アクセス不可
            };
            collect_uninstall_entries(&key, InstallScope::System, &mut records);
        }
        records
    }

    /// ロード済みユーザーハイブを列挙する（遅い経路）。
    pub(super) fn user_records() -> Vec<SoftwareRecord> {
        let mut records = Vec::new();
        for hive in enumerate_subkeys(HKEY_USERS) {
            if is_skippable_hive(&hive) {
                continue;
            }
            let path = format!("{}\\{}", hive, UNINSTALL_SUBTREE);
            let Some(key) = open_key(HKEY_USERS, &path, KEY_READ_ENUM) else {
                continue; // ハイブにアンインストールサブツリーがない
            };
            let owner = resolve_sid_owner(&hive).unwrap_or_else(|| UNKNOWN_USER.to_string());
            collect_uninstall_entries(&key, InstallScope::User { owner }, &mut records);
        }
        records
    }

    fn collect_uninstall_entries(
        parent: &RegKeyGuard,
        scope: InstallScope,
        records: &mut Vec<SoftwareRecord>,
    ) {
        for subkey in enumerate_subkeys(parent.0) {
            let Some(entry) = open_subkey(parent.0, &subkey, KEY_QUERY_VALUE) else {
                continue;
            };
            // DisplayNameのないキー（更新プログラム等）は検出対象外
            let Some(display_name) = read_reg_string(entry.0, "DisplayName") else {
                continue;
            };
            if display_name.trim().is_empty() {
                continue;
            }
            records.push(SoftwareRecord {
                display_name,
                publisher: read_reg_string(entry.0, "Publisher"),
                version: read_reg_string(entry.0, "DisplayVersion"),
                scope: scope.clone(),
            });
        }
    }

    fn open_key(root: HKEY, path: &str, sam: REG_SAM_FLAGS) -> Option<RegKeyGuard> {
        let wide_path = to_wide(path); // API呼び出し中にVecを生存させる
        let mut key = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(root, PCWSTR(wide_path.as_ptr()), Some(0), sam, &mut key)
        };
        if status != ERROR_SUCCESS {
            return None;
        }
        Some(RegKeyGuard(key))
    }

    fn open_subkey(parent: HKEY, name: &str, sam: REG_SAM_FLAGS) -> Option<RegKeyGuard> {
        let wide = to_wide(name);
        let mut key = HKEY::default();
        let status =
            unsafe { RegOpenKeyExW(parent, PCWSTR(wide.as_ptr()), Some(0), sam, &mut key) };
        if status != ERROR_SUCCESS {
            return None;
        }
        Some(RegKeyGuard(key))
    }

    fn enumerate_subkeys(hkey: HKEY) -> Vec<String> {
        let mut names = Vec::new();
        let mut index = 0u32;
        loop {
            let mut buf = [0u16; 260];
            let mut len = buf.len() as u32;
            let status = unsafe {
                RegEnumKeyExW(
                    hkey,
                    index,
                    Some(PWSTR(buf.as_mut_ptr())),
                    &mut len,
                    None,
                    None,
                    None,
                    None,
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            if status != ERROR_SUCCESS {
                // 列挙途中の失敗も打ち切りとして扱う（部分失敗で走査全体を止めない）
                break;
            }
            if len > 0 {
                names.push(String::from_utf16_lossy(&buf[..len as usize]));
            }
            index += 1;
        }
        names
    }

    /// REG_SZ / REG_EXPAND_SZ の値を読む。欠落・型不一致・失敗はNone。
    fn read_reg_string(hkey: HKEY, name: &str) -> Option<String> {
        unsafe {
            let name_w = to_wide(name);
            let mut size_bytes: u32 = 0;
            let status = RegGetValueW(
                hkey,
                PCWSTR::null(),
                PCWSTR(name_w.as_ptr()),
                RRF_RT_REG_SZ | RRF_RT_REG_EXPAND_SZ,
                None,
                None,
                Some(&mut size_bytes),
            );
            if status != ERROR_SUCCESS || size_bytes == 0 {
                return None;
            }
            let mut buffer: Vec<u16> = vec![0u16; (size_bytes as usize / 2).max(1)];
            let status = RegGetValueW(
                hkey,
                PCWSTR::null(),
                PCWSTR(name_w.as_ptr()),
                RRF_RT_REG_SZ | RRF_RT_REG_EXPAND_SZ,
                None,
                Some(buffer.as_mut_ptr() as *mut _),
                Some(&mut size_bytes),
            );
            if status != ERROR_SUCCESS {
                return None;
            }
            // size_bytesは終端nullを含むため適切に切り詰める
            let char_len = (size_bytes as usize / 2).saturating_sub(1);
            buffer.truncate(char_len);
            Some(String::from_utf16_lossy(&buffer))
        }
    }

    /// ハイブ名（SID文字列）を domain\username へ解決する。失敗はNone。
    fn resolve_sid_owner(sid_string: &str) -> Option<String> {
        unsafe {
            let sid_w = to_wide(sid_string);
            let mut sid = PSID::default();
            if ConvertStringSidToSidW(PCWSTR(sid_w.as_ptr()), &mut sid).is_err() {
                return None;
            }

            let mut name_len: u32 = 0;
            let mut domain_len: u32 = 0;
            let mut sid_use = SID_NAME_USE(0);
            // 1回目はバッファ長の取得のみ（失敗が期待値）
            let _ = LookupAccountSidW(
                PCWSTR::null(),
                sid,
                None,
                &mut name_len,
                None,
                &mut domain_len,
                &mut sid_use,
            );
            if name_len == 0 {
                let _ = LocalFree(Some(HLOCAL(sid.0)));
                return None;
            }

            let mut name_buf: Vec<u16> = vec![0u16; name_len as usize];
            let mut domain_buf: Vec<u16> = vec![0u16; domain_len.max(1) as usize];
            let looked_up = LookupAccountSidW(
                PCWSTR::null(),
                sid,
                Some(PWSTR(name_buf.as_mut_ptr())),
                &mut name_len,
                Some(PWSTR(domain_buf.as_mut_ptr())),
                &mut domain_len,
                &mut sid_use,
            );
            let _ = LocalFree(Some(HLOCAL(sid.0)));
            if looked_up.is_err() {
                return None;
            }

            let name = String::from_utf16_lossy(&name_buf[..name_len as usize]);
            let domain = String::from_utf16_lossy(&domain_buf[..domain_len as usize]);
            if name.is_empty() {
                return None;
            }
            if domain.is_empty() {
                Some(name)
            } else {
                Some(format!("{}\\{}", domain, name))
            }
        }
    }

    fn to_wide(s: &str) -> Vec<u16> {
        let mut wide: Vec<u16> = s.encode_utf16().collect();
        wide.push(0);
        wide
    }
}
