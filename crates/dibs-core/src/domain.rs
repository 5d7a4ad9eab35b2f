use std::fmt;

/// Chat user name, as reported by the host runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserName(pub String);

/// Chat room identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoomId(pub String);

impl UserName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
