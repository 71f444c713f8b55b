// ============================================================
// COLUMN RESOLVER
// ============================================================
// Map contact fields to header columns using prioritized aliases

use csv::StringRecord;

/// Contact attributes that can be read from an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    FirstName,
    LastName,
    Company,
    Title,
    Email,
    Location,
    ProfileUrl,
}

impl ContactField {
    pub const ALL: [ContactField; 8] = [
        ContactField::Name,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Company,
        ContactField::Title,
        ContactField::Email,
        ContactField::Location,
        ContactField::ProfileUrl,
    ];

    /// Source column names, highest priority first
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            ContactField::Name => &["name", "full_name", "full name", "contact_name"],
            ContactField::FirstName => &["first_name", "first name", "firstname"],
            ContactField::LastName => &["last_name", "last name", "lastname"],
            ContactField::Company => &["company", "company_name", "organization"],
            ContactField::Title => &["position", "title", "job_title", "job title"],
            ContactField::Email => &["email address", "email", "email_address"],
            ContactField::Location => &["location", "city"],
            ContactField::ProfileUrl => &["url", "profile_url", "profile url", "linkedin_url"],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column indices per field, resolved once per header
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    columns: [Vec<usize>; 8],
}

impl ColumnResolver {
    pub fn new(headers: &[String]) -> Self {
        let mut columns: [Vec<usize>; 8] = Default::default();

        for field in ContactField::ALL {
            let slot = &mut columns[field.slot()];
            for candidate in field.candidates() {
                // exact spelling first, then any casing
                let exact = headers.iter().position(|h| h == candidate);
                let folded = headers
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| h.eq_ignore_ascii_case(candidate))
                    .map(|(i, _)| i);

                for idx in exact.into_iter().chain(folded) {
                    if !slot.contains(&idx) {
                        slot.push(idx);
                    }
                }
            }
        }

        Self { columns }
    }

    /// Whether any column feeds `field`
    pub fn has(&self, field: ContactField) -> bool {
        !self.columns[field.slot()].is_empty()
    }

    /// First non-empty trimmed value for `field` in `record`
    pub fn value<'r>(&self, field: ContactField, record: &'r StringRecord) -> Option<&'r str> {
        self.columns[field.slot()]
            .iter()
            .filter_map(|&idx| record.get(idx))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    /// Owned variant of [`value`](Self::value) for optional record fields
    pub fn owned(&self, field: ContactField, record: &StringRecord) -> Option<String> {
        self.value(field, record).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_match() {
        let resolver = ColumnResolver::new(&headers(&["First Name", "Last Name", "Company"]));
        let record = StringRecord::from(vec!["Jane", "Doe", "Acme"]);

        assert_eq!(resolver.value(ContactField::FirstName, &record), Some("Jane"));
        assert_eq!(resolver.value(ContactField::Company, &record), Some("Acme"));
        assert!(!resolver.has(ContactField::Name));
    }

    #[test]
    fn test_exact_match_preferred() {
        let resolver = ColumnResolver::new(&headers(&["NAME", "name", "company"]));
        let record = StringRecord::from(vec!["Upper", "Lower", "Acme"]);

        assert_eq!(resolver.value(ContactField::Name, &record), Some("Lower"));
    }

    #[test]
    fn test_priority_falls_through_empty_values() {
        let resolver = ColumnResolver::new(&headers(&["title", "position", "name"]));
        let record = StringRecord::from(vec!["CTO", "  ", "Jane"]);

        assert_eq!(resolver.value(ContactField::Title, &record), Some("CTO"));
    }

    #[test]
    fn test_higher_priority_alias_wins() {
        let resolver = ColumnResolver::new(&headers(&["title", "position", "name"]));
        let record = StringRecord::from(vec!["CTO", "Engineer", "Jane"]);

        assert_eq!(resolver.value(ContactField::Title, &record), Some("Engineer"));
    }

    #[test]
    fn test_missing_column_is_none() {
        let resolver = ColumnResolver::new(&headers(&["name", "company", "title"]));
        let record = StringRecord::from(vec!["Jane", "Acme", "CTO"]);

        assert_eq!(resolver.value(ContactField::Email, &record), None);
        assert_eq!(resolver.owned(ContactField::Location, &record), None);
    }
}
