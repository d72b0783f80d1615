// Staff member model

/// A staff member who can hold appointments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    pub id: Option<i64>,
    pub name: String,
    pub active: bool,
}

impl Staff {
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Staff name cannot be empty".to_string());
        }
        Ok(Self {
            id: None,
            name,
            active: true,
        })
    }
}
