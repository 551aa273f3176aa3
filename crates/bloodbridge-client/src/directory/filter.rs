//! The active list query and its canonical query-string form.

use std::fmt;
use std::hash::{Hash, Hasher};

use bloodbridge_core::AppError;
use bloodbridge_entity::{BloodGroup, BloodRequest, Donor, RequestStatus, Urgency};

use crate::gateway::encode_query;

/// Label the UI uses for "no constraint".
pub const ALL: &str = "all";

/// Which list a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterScope {
    /// Blood requests: status and urgency apply.
    Requests,
    /// Donors: only blood group and location apply.
    Donors,
}

/// The active query of a list screen.
///
/// `None` and empty values mean "no constraint" and are left out of the
/// query string entirely. Two filters are equal iff their canonical query
/// strings are equal, so re-applying an unchanged filter can be detected
/// cheaply.
#[derive(Debug, Clone)]
pub struct Filter {
    scope: FilterScope,
    blood_group: Option<BloodGroup>,
    location: String,
    urgency: Option<Urgency>,
    status: Option<RequestStatus>,
}

impl Filter {
    /// Filter for the active-requests list.
    pub fn requests() -> Self {
        Self {
            scope: FilterScope::Requests,
            blood_group: None,
            location: String::new(),
            urgency: None,
            status: Some(RequestStatus::Active),
        }
    }

    /// Filter for the donor search list.
    pub fn donors() -> Self {
        Self {
            scope: FilterScope::Donors,
            blood_group: None,
            location: String::new(),
            urgency: None,
            status: None,
        }
    }

    /// Requests filter pre-seeded with a donor's blood group and location.
    pub fn requests_for(donor: Option<&Donor>) -> Self {
        let filter = Self::requests();
        match donor {
            Some(d) => filter
                .with_blood_group(Some(d.blood_group))
                .with_location(&d.location),
            None => filter,
        }
    }

    /// Set the blood group constraint.
    pub fn with_blood_group(mut self, group: Option<BloodGroup>) -> Self {
        self.blood_group = group;
        self
    }

    /// Set the location substring. Surrounding whitespace is dropped.
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.trim().to_string();
        self
    }

    /// Set the urgency constraint.
    pub fn with_urgency(mut self, urgency: Option<Urgency>) -> Self {
        self.urgency = urgency;
        self
    }

    /// Set the status constraint.
    pub fn with_status(mut self, status: Option<RequestStatus>) -> Self {
        self.status = status;
        self
    }

    /// Set the blood group from a UI label; `"all"` or blank clears it.
    pub fn set_blood_group_label(&mut self, label: &str) -> Result<(), AppError> {
        self.blood_group = parse_choice(label)?;
        Ok(())
    }

    /// Set the urgency from a UI label; `"all"` or blank clears it.
    pub fn set_urgency_label(&mut self, label: &str) -> Result<(), AppError> {
        self.urgency = parse_choice(label)?;
        Ok(())
    }

    /// Set the location substring.
    pub fn set_location(&mut self, location: &str) {
        self.location = location.trim().to_string();
    }

    /// Reset every constraint to the donor's defaults ("all" for guests).
    pub fn clear(&mut self, donor: Option<&Donor>) {
        let fresh = match self.scope {
            FilterScope::Requests => Self::requests_for(donor),
            FilterScope::Donors => Self::donors(),
        };
        *self = fresh;
    }

    pub fn scope(&self) -> FilterScope {
        self.scope
    }

    pub fn blood_group(&self) -> Option<BloodGroup> {
        self.blood_group
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }

    pub fn status(&self) -> Option<RequestStatus> {
        self.status
    }

    /// Query parameters in canonical order, sentinels omitted.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.scope == FilterScope::Requests {
            if let Some(status) = self.status {
                pairs.push(("status".to_string(), status.as_str().to_string()));
            }
        }
        if let Some(group) = self.blood_group {
            pairs.push(("bloodGroup".to_string(), group.as_str().to_string()));
        }
        if !self.location.is_empty() {
            pairs.push(("location".to_string(), self.location.clone()));
        }
        if self.scope == FilterScope::Requests {
            if let Some(urgency) = self.urgency {
                pairs.push(("urgency".to_string(), urgency.as_str().to_string()));
            }
        }
        pairs
    }

    /// The canonical, URL-encoded query string (without `page`).
    pub fn to_query_string(&self) -> String {
        encode_query(&self.query_pairs())
    }

    /// Local match of a request against every constraint.
    pub fn matches_request(&self, request: &BloodRequest) -> bool {
        self.status.is_none_or(|s| request.status == s)
            && self.blood_group.is_none_or(|g| request.blood_group == g)
            && self.urgency.is_none_or(|u| request.urgency == u)
            && request.location_matches(&self.location)
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.to_query_string() == other.to_query_string()
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_query_string().hash(state);
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.to_query_string();
        if query.is_empty() {
            write!(f, "(no filter)")
        } else {
            write!(f, "{query}")
        }
    }
}

fn parse_choice<T>(label: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = AppError>,
{
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case(ALL) {
        Ok(None)
    } else {
        label.parse().map(Some)
    }
}
