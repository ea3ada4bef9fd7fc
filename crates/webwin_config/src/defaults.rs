// Various default functions to be used by serde

use camino::Utf8PathBuf;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_mainpage() -> String {
    "index.html".into()
}

pub(crate) fn default_webroot() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}
