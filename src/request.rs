use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Namespace shared by every File Station API
pub const API_NAMESPACE: &str = "SYNO.FileStation";

/// CGI endpoint serving all File Station APIs
pub const ENTRY_PATH: &str = "entry.cgi";

/// How the parameters of an [`ApiRequest`] travel over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// `application/x-www-form-urlencoded` POST
    Form,
    /// `multipart/form-data` POST carrying an in-memory file
    Multipart(FilePart),
}

/// In-memory file attached to a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// A single File Station call, before transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Fully qualified API name, e.g. `SYNO.FileStation.List`
    pub api: String,
    /// Endpoint relative to `/webapi/`
    pub path: &'static str,
    pub method: &'static str,
    /// API version, `None` means the client's configured version
    pub version: Option<u32>,
    pub params: Vec<(&'static str, String)>,
    pub content: ContentKind,
}

impl ApiRequest {
    /// Creates a form request against `SYNO.FileStation.<api>`
    #[must_use]
    pub fn file_station(api: &str, method: &'static str) -> Self {
        Self {
            api: format!("{API_NAMESPACE}.{api}"),
            path: ENTRY_PATH,
            method,
            version: None,
            params: Vec::new(),
            content: ContentKind::Form,
        }
    }

    /// Creates a form request against an API outside the File Station namespace
    #[must_use]
    pub fn external(api: &str, version: u32, method: &'static str) -> Self {
        Self {
            api: api.to_string(),
            path: ENTRY_PATH,
            method,
            version: Some(version),
            params: Vec::new(),
            content: ContentKind::Form,
        }
    }

    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present
    #[must_use]
    pub fn param_opt<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.content = ContentKind::Multipart(part);
        self
    }

    /// Looks up the value of a parameter by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self.content, ContentKind::Multipart(_))
    }
}

/// One or more remote paths
///
/// A single path converts into a list of one, so every operation accepting
/// paths can be called with either form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList(Vec<String>);

impl PathList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.0
    }

    /// Encodes the list as a JSON array literal, e.g. `["/a","/b"]`.
    /// An empty list encodes as an empty string.
    #[must_use]
    pub fn to_json_array(&self) -> String {
        encode_json_array(&self.0)
    }

    /// Joins the list with commas, e.g. `/a,/b`
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl From<&str> for PathList {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for PathList {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<Vec<String>> for PathList {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<Vec<&str>> for PathList {
    fn from(paths: Vec<&str>) -> Self {
        Self(paths.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for PathList {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|path| (*path).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathList {
    fn from(paths: [&str; N]) -> Self {
        Self(paths.iter().map(|path| (*path).to_string()).collect())
    }
}

fn encode_json_array<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let values: Vec<&str> = values.iter().map(|value| value.as_ref()).collect();
    // Serializing a list of strings cannot fail
    serde_json::to_string(&values).unwrap_or_default()
}

/// Extended metadata that can be requested alongside files and shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileField {
    RealPath,
    Size,
    Owner,
    Time,
    Perm,
    MountPointType,
    Type,
    VolumeStatus,
}

impl FileField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FileField::RealPath => "real_path",
            FileField::Size => "size",
            FileField::Owner => "owner",
            FileField::Time => "time",
            FileField::Perm => "perm",
            FileField::MountPointType => "mount_point_type",
            FileField::Type => "type",
            FileField::VolumeStatus => "volume_status",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "real_path" => Some(FileField::RealPath),
            "size" => Some(FileField::Size),
            "owner" => Some(FileField::Owner),
            "time" => Some(FileField::Time),
            "perm" => Some(FileField::Perm),
            "mount_point_type" => Some(FileField::MountPointType),
            "type" => Some(FileField::Type),
            "volume_status" => Some(FileField::VolumeStatus),
            _ => None,
        }
    }
}

impl fmt::Display for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields returned by `list_share` when additional info is requested
pub const SHARE_FIELDS: [FileField; 5] = [
    FileField::RealPath,
    FileField::Owner,
    FileField::Time,
    FileField::Perm,
    FileField::VolumeStatus,
];

/// Fields returned by `list` and `create` when additional info is requested
pub const LIST_FIELDS: [FileField; 5] = [
    FileField::RealPath,
    FileField::Size,
    FileField::Owner,
    FileField::Time,
    FileField::Perm,
];

/// Fields `getinfo` accepts
pub const FILE_INFO_FIELDS: [FileField; 7] = [
    FileField::RealPath,
    FileField::Size,
    FileField::Owner,
    FileField::Time,
    FileField::Perm,
    FileField::MountPointType,
    FileField::Type,
];

/// An ordered, deduplicated set of [`FileField`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeSet<FileField>);

impl Fields {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Either nothing or the fixed share field list
    #[must_use]
    pub fn shares(additional: bool) -> Self {
        Self::toggled(additional, &SHARE_FIELDS)
    }

    /// Either nothing or the fixed file listing field list
    #[must_use]
    pub fn listing(additional: bool) -> Self {
        Self::toggled(additional, &LIST_FIELDS)
    }

    /// Keeps only the requested fields `getinfo` supports
    #[must_use]
    pub fn file_info(requested: impl IntoIterator<Item = FileField>) -> Self {
        Self(
            requested
                .into_iter()
                .filter(|field| FILE_INFO_FIELDS.contains(field))
                .collect(),
        )
    }

    /// Same as [`Self::file_info`], silently dropping unknown names
    #[must_use]
    pub fn file_info_from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::file_info(names.into_iter().filter_map(FileField::from_name))
    }

    fn toggled(enabled: bool, fields: &[FileField]) -> Self {
        if enabled {
            Self(fields.iter().copied().collect())
        } else {
            Self::none()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FileField> + '_ {
        self.0.iter().copied()
    }

    /// `real_path,size,owner` style, empty when no fields are set
    #[must_use]
    pub fn to_comma_separated(&self) -> String {
        self.iter()
            .map(FileField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `["real_path","size"]` style, empty when no fields are set
    #[must_use]
    pub fn to_json_array(&self) -> String {
        let names: Vec<&str> = self.iter().map(FileField::as_str).collect();
        encode_json_array(&names)
    }
}

/// Sort key for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Name,
    Size,
    User,
    Group,
    Mtime,
    Atime,
    Ctime,
    Crtime,
    Posix,
    Type,
}

impl SortBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Size => "size",
            SortBy::User => "user",
            SortBy::Group => "group",
            SortBy::Mtime => "mtime",
            SortBy::Atime => "atime",
            SortBy::Ctime => "ctime",
            SortBy::Crtime => "crtime",
            SortBy::Posix => "posix",
            SortBy::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Which kinds of entries a listing returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileType {
    #[default]
    All,
    File,
    Dir,
}

impl FileType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::All => "all",
            FileType::File => "file",
            FileType::Dir => "dir",
        }
    }
}

/// `open` lets the browser display the file, `download` forces an attachment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadMode {
    #[default]
    Open,
    Download,
}

impl DownloadMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadMode::Open => "open",
            DownloadMode::Download => "download",
        }
    }
}

/// Options for listing shared folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareListOptions {
    pub only_writable: bool,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    pub additional: bool,
}

impl Default for ShareListOptions {
    fn default() -> Self {
        Self {
            only_writable: false,
            limit: 25,
            offset: 0,
            sort_by: SortBy::Name,
            sort_direction: SortDirection::Asc,
            additional: false,
        }
    }
}

/// Options for listing (and searching) a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub folder_path: String,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    /// Glob pattern, e.g. `*.txt`; empty matches everything
    pub pattern: String,
    pub file_type: FileType,
    pub additional: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            folder_path: String::from("/home"),
            limit: 25,
            offset: 0,
            sort_by: SortBy::Name,
            sort_direction: SortDirection::Asc,
            pattern: String::new(),
            file_type: FileType::All,
            additional: false,
        }
    }
}

impl ListOptions {
    #[must_use]
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            folder_path: folder_path.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateFolderOptions {
    /// Existing parent folder, e.g. `/home`
    pub folder_path: String,
    /// Name of the new folder
    pub name: String,
    /// Create missing parents instead of failing
    pub force_parent: bool,
    pub additional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Destination folder, e.g. `/home/docs`
    pub path: String,
    pub file_name: String,
    pub content: Vec<u8>,
    pub create_parents: bool,
    /// `None` lets the server decide what to do with an existing file
    pub overwrite: Option<bool>,
    pub mtime: Option<DateTime<Utc>>,
    pub crtime: Option<DateTime<Utc>>,
    pub atime: Option<DateTime<Utc>>,
}

#[must_use]
pub fn info() -> ApiRequest {
    ApiRequest::file_station("Info", "get")
}

#[must_use]
pub fn list_shares(options: &ShareListOptions) -> ApiRequest {
    ApiRequest::file_station("List", "list_share")
        .param("onlywritable", options.only_writable)
        .param("limit", options.limit)
        .param("offset", options.offset)
        .param("sort_by", options.sort_by.as_str())
        .param("sort_direction", options.sort_direction.as_str())
        .param(
            "additional",
            Fields::shares(options.additional).to_comma_separated(),
        )
}

#[must_use]
pub fn file_info(paths: &PathList, fields: &Fields) -> ApiRequest {
    let fields = Fields::file_info(fields.iter());
    ApiRequest::file_station("List", "getinfo")
        .param("path", paths.to_json_array())
        .param("additional", fields.to_json_array())
}

#[must_use]
pub fn list(options: &ListOptions) -> ApiRequest {
    ApiRequest::file_station("List", "list")
        .param("folder_path", &options.folder_path)
        .param("limit", options.limit)
        .param("offset", options.offset)
        .param("sort_by", options.sort_by.as_str())
        .param("sort_direction", options.sort_direction.as_str())
        .param("pattern", &options.pattern)
        .param("filetype", options.file_type.as_str())
        .param(
            "additional",
            Fields::listing(options.additional).to_comma_separated(),
        )
}

/// Same wire call as [`list`] with the pattern replaced
#[must_use]
pub fn search(pattern: &str, options: &ListOptions) -> ApiRequest {
    let options = ListOptions {
        pattern: pattern.to_string(),
        ..options.clone()
    };
    list(&options)
}

#[must_use]
pub fn download(paths: &PathList, mode: DownloadMode) -> ApiRequest {
    ApiRequest::file_station("Download", "download")
        .param("path", paths.joined())
        .param("mode", mode.as_str())
}

#[must_use]
pub fn create_folder(options: &CreateFolderOptions) -> ApiRequest {
    ApiRequest::file_station("CreateFolder", "create")
        .param("folder_path", &options.folder_path)
        .param("name", &options.name)
        .param("force_parent", options.force_parent)
        .param(
            "additional",
            Fields::listing(options.additional).to_comma_separated(),
        )
}

#[must_use]
pub fn delete(paths: &PathList, recursive: bool) -> ApiRequest {
    ApiRequest::file_station("Delete", "delete")
        .param("path", paths.to_json_array())
        .param("recursive", recursive)
}

/// Builds the multipart upload call; the file part always goes last on the wire
#[must_use]
pub fn upload(options: &UploadOptions) -> ApiRequest {
    ApiRequest::file_station("Upload", "upload")
        .param("path", &options.path)
        .param("create_parents", options.create_parents)
        .param_opt("overwrite", options.overwrite)
        .param_opt("mtime", options.mtime.map(|t| t.timestamp_millis()))
        .param_opt("crtime", options.crtime.map(|t| t.timestamp_millis()))
        .param_opt("atime", options.atime.map(|t| t.timestamp_millis()))
        .file(FilePart {
            file_name: options.file_name.clone(),
            content: options.content.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_list_request() {
        let options = ListOptions {
            folder_path: String::from("/home"),
            limit: 10,
            offset: 0,
            sort_by: SortBy::Name,
            sort_direction: SortDirection::Asc,
            pattern: String::from("*.txt"),
            file_type: FileType::File,
            additional: true,
        };
        let request = list(&options);

        assert_eq!(request.api, "SYNO.FileStation.List");
        assert_eq!(request.path, "entry.cgi");
        assert_eq!(request.method, "list");
        let expected = [
            ("folder_path", "/home"),
            ("limit", "10"),
            ("offset", "0"),
            ("sort_by", "name"),
            ("sort_direction", "asc"),
            ("pattern", "*.txt"),
            ("filetype", "file"),
            ("additional", "real_path,size,owner,time,perm"),
        ];
        let actual: Vec<(&str, &str)> = request
            .params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_search_matches_list() {
        let options = ListOptions {
            pattern: String::from("ignored"),
            ..ListOptions::new("/photo")
        };
        let searched = search("*.jpg", &options);
        let listed = list(&ListOptions {
            pattern: String::from("*.jpg"),
            ..options
        });
        assert_eq!(searched, listed);
    }

    #[test]
    fn test_delete_request() {
        let request = delete(&PathList::from(["/a", "/b"]), true);
        assert_eq!(request.api, "SYNO.FileStation.Delete");
        assert_eq!(request.method, "delete");
        assert_eq!(request.get("path"), Some(r#"["/a","/b"]"#));
        assert_eq!(request.get("recursive"), Some("true"));
    }

    #[test]
    fn test_single_path_becomes_list() {
        let request = delete(&"/a".into(), false);
        assert_eq!(request.get("path"), Some(r#"["/a"]"#));
        assert_eq!(request.get("recursive"), Some("false"));
    }

    #[test]
    fn test_path_list_json_decodes_to_original() {
        let paths = vec!["/home/a b", "/home/ü", "/x/\"quoted\"", "/home"];
        let encoded = PathList::from(paths.clone()).to_json_array();
        assert!(encoded.starts_with("[\"") && encoded.ends_with("\"]"));
        let decoded: Vec<String> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, paths);
    }

    #[test]
    fn test_empty_path_list_encodes_empty() {
        assert_eq!(PathList::default().to_json_array(), "");
    }

    #[test]
    fn test_additional_toggle() {
        assert_eq!(Fields::shares(false).to_comma_separated(), "");
        assert_eq!(Fields::listing(false).to_comma_separated(), "");
        assert_eq!(
            Fields::shares(true).to_comma_separated(),
            "real_path,owner,time,perm,volume_status"
        );
        assert_eq!(
            Fields::listing(true).to_comma_separated(),
            "real_path,size,owner,time,perm"
        );
    }

    #[test]
    fn test_share_request() {
        let request = list_shares(&ShareListOptions {
            only_writable: true,
            additional: true,
            ..Default::default()
        });
        assert_eq!(request.method, "list_share");
        assert_eq!(request.get("onlywritable"), Some("true"));
        assert_eq!(request.get("limit"), Some("25"));
        assert_eq!(
            request.get("additional"),
            Some("real_path,owner,time,perm,volume_status")
        );
    }

    #[test]
    fn test_file_info_fields_intersection() {
        let requested =
            Fields::file_info_from_names(["type", "volume_status", "bogus", "size", "size"]);
        assert_eq!(requested.to_json_array(), r#"["size","type"]"#);
        assert!(requested.iter().all(|field| FILE_INFO_FIELDS.contains(&field)));

        let request = file_info(&"/home/a.txt".into(), &Fields::shares(true));
        assert_eq!(request.method, "getinfo");
        assert_eq!(request.get("path"), Some(r#"["/home/a.txt"]"#));
        assert_eq!(
            request.get("additional"),
            Some(r#"["real_path","owner","time","perm"]"#)
        );

        let request = file_info(&"/home/a.txt".into(), &Fields::none());
        assert_eq!(request.get("additional"), Some(""));
    }

    #[test]
    fn test_download_request() {
        let request = download(&PathList::from(["/a.txt", "/b.txt"]), DownloadMode::default());
        assert_eq!(request.api, "SYNO.FileStation.Download");
        assert_eq!(request.get("path"), Some("/a.txt,/b.txt"));
        assert_eq!(request.get("mode"), Some("open"));
    }

    #[test]
    fn test_create_folder_request() {
        let request = create_folder(&CreateFolderOptions {
            folder_path: String::from("/home"),
            name: String::from("new"),
            force_parent: true,
            additional: false,
        });
        assert_eq!(request.api, "SYNO.FileStation.CreateFolder");
        assert_eq!(request.method, "create");
        assert_eq!(request.get("force_parent"), Some("true"));
        assert_eq!(request.get("additional"), Some(""));
        assert!(!request.is_multipart());
    }

    #[test]
    fn test_upload_request() {
        let mtime = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let request = upload(&UploadOptions {
            path: String::from("/home/docs"),
            file_name: String::from("notes.txt"),
            content: b"hello".to_vec(),
            create_parents: true,
            overwrite: Some(false),
            mtime: Some(mtime),
            ..Default::default()
        });

        assert_eq!(request.api, "SYNO.FileStation.Upload");
        assert_eq!(request.method, "upload");
        assert_eq!(request.get("path"), Some("/home/docs"));
        assert_eq!(request.get("create_parents"), Some("true"));
        assert_eq!(request.get("overwrite"), Some("false"));
        assert_eq!(request.get("mtime"), Some("1700000000123"));
        assert_eq!(request.get("crtime"), None);
        assert_eq!(request.get("atime"), None);
        assert_eq!(
            request.content,
            ContentKind::Multipart(FilePart {
                file_name: String::from("notes.txt"),
                content: b"hello".to_vec(),
            })
        );
    }

    #[test]
    fn test_info_request() {
        let request = info();
        assert_eq!(request.api, "SYNO.FileStation.Info");
        assert_eq!(request.method, "get");
        assert!(request.params.is_empty());
        assert_eq!(request.version, None);
    }
}
