use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response from Synology API
#[derive(Deserialize, Debug)]
pub struct SynologyResponse<D> {
    pub success: bool,
    pub data: Option<D>,
    pub error: Option<ApiError>,
}

/// Error information from Synology API
#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: i32,
    /// Per-path failures reported by batch operations
    pub errors: Option<Vec<PathError>>,
}

#[derive(Deserialize, Debug)]
pub struct PathError {
    pub code: i32,
    pub path: Option<String>,
}

/// Body of a call that may return either an API response or raw content
#[derive(Debug)]
pub enum Payload<D> {
    /// A successful response envelope
    Parsed(D),
    /// The body, unchanged
    Raw(Vec<u8>),
}

impl<D> Payload<D> {
    #[must_use]
    pub fn parsed(&self) -> Option<&D> {
        match self {
            Payload::Parsed(data) => Some(data),
            Payload::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Payload::Parsed(_) => None,
            Payload::Raw(body) => Some(body),
        }
    }

    /// Raw body as text, lossy for invalid UTF-8
    #[must_use]
    pub fn raw_text(&self) -> Option<String> {
        self.raw().map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

/// Authentication response data
#[derive(Deserialize, Debug)]
pub struct AuthData {
    /// Session ID used for authenticated requests
    pub sid: String,
    #[serde(default)]
    pub did: String,
}

/// File Station capabilities
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Info {
    pub hostname: String,
    pub is_manager: bool,
    pub support_sharing: bool,
    pub support_virtual_protocol: String,
    pub support_vfs: bool,
}

/// Shared folders
#[derive(Deserialize, Debug)]
pub struct Shares {
    pub total: u32,
    pub offset: u32,
    pub shares: Vec<FileItem>,
}

/// Content of a folder
#[derive(Deserialize, Debug)]
pub struct FileList {
    pub total: u32,
    pub offset: u32,
    pub files: Vec<FileItem>,
}

/// Result of `getinfo`
#[derive(Deserialize, Debug)]
pub struct FileInfoList {
    pub files: Vec<FileItem>,
}

/// Result of folder creation
#[derive(Deserialize, Debug)]
pub struct Folders {
    pub folders: Vec<FileItem>,
}

/// A file, folder or share
#[derive(Deserialize, Debug)]
pub struct FileItem {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub isdir: bool,
    /// Set by `getinfo` for paths that could not be read
    pub code: Option<i32>,
    pub additional: Option<FileAdditional>,
}

/// Extended metadata, present when requested
#[derive(Deserialize, Debug, Default)]
pub struct FileAdditional {
    pub real_path: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    pub owner: Option<Owner>,
    pub time: Option<FileTime>,
    pub perm: Option<Perm>,
    pub mount_point_type: Option<String>,
    /// File extension
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub volume_status: Option<VolumeStatus>,
}

#[derive(Deserialize, Debug)]
pub struct Owner {
    pub user: String,
    pub group: String,
    pub uid: u32,
    pub gid: u32,
}

#[derive(Deserialize, Debug)]
pub struct FileTime {
    #[serde(with = "ts_seconds")]
    pub atime: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub mtime: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub ctime: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub crtime: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct Perm {
    /// POSIX mode written as decimal digits, e.g. `755`
    pub posix: u32,
    #[serde(default)]
    pub is_acl_mode: bool,
    pub share_right: Option<String>,
    pub acl: Option<Acl>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Acl {
    pub append: bool,
    pub del: bool,
    pub exec: bool,
    pub read: bool,
    pub write: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct VolumeStatus {
    pub freespace: u64,
    pub totalspace: u64,
    pub readonly: bool,
}

/// Result of an upload, all fields are optional across DSM versions
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct UploadResult {
    #[serde(rename = "blSkip")]
    pub skipped: bool,
    pub file: String,
    pub pid: u64,
    pub progress: u32,
}

/// Describes a File Station or common API error code
#[must_use]
pub fn error_description(code: i32) -> &'static str {
    match code {
        100 => "Unknown error",
        101 => "No parameter of API, method or version",
        102 => "The requested API does not exist",
        103 => "The requested method does not exist",
        104 => "The requested version does not support the functionality",
        105 => "The logged in session does not have permission",
        106 => "Session timeout",
        107 => "Session interrupted by duplicate login",
        119 => "SID not found",
        400 => "Invalid parameter of file operation",
        401 => "Unknown error of file operation",
        402 => "System is too busy",
        403 => "Invalid user does this file operation",
        404 => "Invalid group does this file operation",
        405 => "Invalid user and group does this file operation",
        406 => "Can't get user/group information from the account server",
        407 => "Operation not permitted",
        408 => "No such file or directory",
        409 => "Non-supported file system",
        410 => "Failed to connect internet-based file system",
        411 => "Read-only file system",
        412 => "Filename too long in the non-encrypted file system",
        413 => "Filename too long in the encrypted file system",
        414 => "File already exists",
        415 => "Disk quota exceeded",
        416 => "No space left on device",
        417 => "Input/output error",
        418 => "Illegal name or path",
        419 => "Illegal file name",
        420 => "Illegal file name on FAT file system",
        421 => "Device or resource busy",
        599 => "No such task of the file operation",
        900 => "Failed to delete file(s)/folder(s)",
        1100 => "Failed to create a folder",
        1101 => "The number of folders in the parent folder would exceed the system limitation",
        1800 => "No Content-Length information or received content is incomplete",
        1801 => "Wait time for content expired",
        1802 => "No file name information",
        1803 => "Upload connection is cancelled",
        1804 => "Failed to upload oversized file to FAT file system",
        1805 => "Can't overwrite or skip the existing file",
        _ => "Unrecognized error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_list() {
        let body = r#"{
            "data": {
                "files": [{
                    "isdir": false,
                    "name": "a.txt",
                    "path": "/home/a.txt",
                    "additional": {
                        "real_path": "/volume1/homes/bob/a.txt",
                        "size": 42,
                        "owner": {"gid": 100, "group": "users", "uid": 1026, "user": "bob"},
                        "time": {"atime": 1700000000, "crtime": 1600000000, "ctime": 1700000000, "mtime": 1700000000},
                        "perm": {"acl": {"append": true, "del": true, "exec": false, "read": true, "write": true}, "is_acl_mode": true, "posix": 644}
                    }
                }],
                "offset": 0,
                "total": 1
            },
            "success": true
        }"#;

        let response: SynologyResponse<FileList> = serde_json::from_str(body).unwrap();
        assert!(response.success);
        let list = response.data.unwrap();
        assert_eq!(list.total, 1);
        let file = &list.files[0];
        assert!(!file.isdir);
        let additional = file.additional.as_ref().unwrap();
        assert_eq!(additional.size, Some(42));
        assert_eq!(additional.owner.as_ref().unwrap().user, "bob");
        assert_eq!(
            additional.time.as_ref().unwrap().crtime.timestamp(),
            1_600_000_000
        );
        let acl = additional.perm.as_ref().unwrap().acl.as_ref().unwrap();
        assert!(acl.write);
    }

    #[test]
    fn test_parse_error_envelope() {
        let body = r#"{"error":{"code":900,"errors":[{"code":408,"path":"/home/missing"}]},"success":false}"#;
        let response: SynologyResponse<()> = serde_json::from_str(body).unwrap();
        assert!(!response.success);
        let error = response.error.unwrap();
        assert_eq!(error.code, 900);
        assert_eq!(
            error_description(error.code),
            "Failed to delete file(s)/folder(s)"
        );
        let errors = error.errors.unwrap();
        assert_eq!(errors[0].path.as_deref(), Some("/home/missing"));
    }

    #[test]
    fn test_payload_accessors() {
        let raw: Payload<()> = Payload::Raw(b"plain body".to_vec());
        assert_eq!(raw.raw_text().as_deref(), Some("plain body"));
        assert!(raw.parsed().is_none());

        let parsed = Payload::Parsed(7);
        assert_eq!(parsed.parsed(), Some(&7));
        assert!(parsed.raw().is_none());
    }
}
