use chrono::{DateTime, TimeZone};

/// Dashboard host used to build incident links.
pub const APP_BASE_URL: &str = "https://app.incident.io";

/// Prefix carried by every incident reference.
pub const REFERENCE_PREFIX: &str = "INC-";

/// Format used for the live-view header timestamp.
pub const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extract the organization slug from an incident permalink.
///
/// The slug is the first path segment after the host.
///
/// # Examples
///
/// ```
/// use incli_core::formatting::organization_slug;
///
/// assert_eq!(organization_slug("https://app.incident.io/acme/incidents/27"), Some("acme"));
/// assert_eq!(organization_slug("https://app.incident.io"), None);
/// ```
pub fn organization_slug(permalink: &str) -> Option<&str> {
    permalink
        .split('/')
        .nth(3)
        .filter(|segment| !segment.is_empty())
}

/// Strip the `INC-` prefix from a reference, leaving the number.
///
/// # Examples
///
/// ```
/// use incli_core::formatting::reference_number;
///
/// assert_eq!(reference_number("INC-27"), "27");
/// assert_eq!(reference_number("27"), "27");
/// ```
pub fn reference_number(reference: &str) -> &str {
    reference
        .strip_prefix(REFERENCE_PREFIX)
        .unwrap_or(reference)
}

/// Dashboard link for an incident reference within an organization.
///
/// # Examples
///
/// ```
/// use incli_core::formatting::incident_link;
///
/// assert_eq!(
///     incident_link("acme", "INC-27"),
///     "https://app.incident.io/acme/incidents/27"
/// );
/// ```
pub fn incident_link(organization: &str, reference: &str) -> String {
    format!(
        "{}/{}/incidents/{}",
        APP_BASE_URL,
        organization,
        reference_number(reference)
    )
}

/// Render the live-view header line.
pub fn live_header<Tz>(taken_at: &DateTime<Tz>, count: usize) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} live incidents {}",
        taken_at.format(HEADER_TIME_FORMAT),
        count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_organization_slug_from_permalink() {
        assert_eq!(
            organization_slug("https://app.incident.io/acme-corp/incidents/01HE6"),
            Some("acme-corp")
        );
    }

    #[test]
    fn test_organization_slug_missing_segment() {
        assert_eq!(organization_slug("https://app.incident.io/"), None);
        assert_eq!(organization_slug("not a url"), None);
        assert_eq!(organization_slug(""), None);
    }

    #[test]
    fn test_reference_number_only_strips_leading_prefix() {
        assert_eq!(reference_number("INC-1234"), "1234");
        assert_eq!(reference_number("X-INC-5"), "X-INC-5");
    }

    #[test]
    fn test_incident_link() {
        assert_eq!(
            incident_link("acme", "INC-3"),
            "https://app.incident.io/acme/incidents/3"
        );
    }

    #[test]
    fn test_incident_link_empty_org() {
        assert_eq!(
            incident_link("", "INC-3"),
            "https://app.incident.io//incidents/3"
        );
    }

    #[test]
    fn test_live_header() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(live_header(&at, 4), "2024-03-09 07:05:01 live incidents 4");
    }
}
