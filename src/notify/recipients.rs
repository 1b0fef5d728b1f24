/// Notification recipients: an optional admin plus staff members.
///
/// Iteration yields the admin first, then every staff id that is not the admin's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipientSet {
    admin: Option<String>,
    staff: Vec<String>,
}

impl RecipientSet {
    pub fn new(admin: Option<&str>, staff: &[&str]) -> Self {
        let admin = admin
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);
        let staff = staff
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();

        Self { admin, staff }
    }

    /// Build from an admin id and a comma-separated list of staff ids
    pub fn parse(admin: &str, staff_ids: &str) -> Self {
        let staff: Vec<&str> = staff_ids.split(',').collect();
        Self::new(Some(admin), &staff)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let admin = self.admin.as_deref();
        admin.into_iter().chain(
            self.staff
                .iter()
                .map(String::as_str)
                .filter(move |id| Some(*id) != admin),
        )
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
