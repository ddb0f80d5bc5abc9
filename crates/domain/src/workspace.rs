use sentinel_detect_core::{AppError, AppResult, NonEmptyString};

/// Security-analytics workspace discovered in the resource inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: NonEmptyString,
    name: NonEmptyString,
    resource_group: NonEmptyString,
    location: Option<String>,
}

impl Workspace {
    /// Creates a workspace from its ARM resource id, deriving the resource
    /// group from the id.
    pub fn from_resource_id(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Option<String>,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;
        let resource_group = resource_group_from_id(id.as_str())?;

        Ok(Self {
            name: NonEmptyString::new(name)?,
            resource_group: NonEmptyString::new(resource_group)?,
            location: location.filter(|value| !value.trim().is_empty()),
            id,
        })
    }

    /// Returns the full ARM resource id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the containing resource group.
    #[must_use]
    pub fn resource_group(&self) -> &NonEmptyString {
        &self.resource_group
    }

    /// Returns the Azure region, when the inventory reported one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Extracts the resource group segment from an ARM resource id.
///
/// Resource ids look like
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/...`; the segment name
/// is matched case-insensitively because ARM does not normalize it.
pub fn resource_group_from_id(resource_id: &str) -> AppResult<String> {
    let mut segments = resource_id.split('/').filter(|segment| !segment.is_empty());

    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case("resourceGroups") {
            return segments
                .next()
                .map(str::to_owned)
                .ok_or_else(|| missing_resource_group(resource_id));
        }
    }

    Err(missing_resource_group(resource_id))
}

fn missing_resource_group(resource_id: &str) -> AppError {
    AppError::Validation(format!(
        "resource id '{resource_id}' does not contain a resource group segment"
    ))
}
