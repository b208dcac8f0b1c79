use bytes::Bytes;

/// Content handed over by the OS share sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SharedPayload {
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub files: Vec<SharedFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl SharedPayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.url.is_none() && self.files.is_empty()
    }
}
