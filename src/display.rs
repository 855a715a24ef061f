//! Contact card text for the `contact` command.

use std::fmt;

use crate::config::DisplayConfig;

/// Contact details and, when enabled, certificate verification links.
/// Unset values are left out rather than printed empty.
pub struct ContactCard<'a>(pub &'a DisplayConfig);

impl fmt::Display for ContactCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = self.0;
        writeln!(f, "📬 CONTACT")?;

        if let Some(email) = &display.contact_email {
            writeln!(f, "   Email:    {email}")?;
        }
        if let Some(linkedin) = &display.linkedin_url {
            writeln!(f, "   LinkedIn: {linkedin}")?;
        }
        if display.contact_email.is_none() && display.linkedin_url.is_none() {
            writeln!(f, "   (no contact details configured)")?;
        }

        if display.show_certificate_links && !display.certificates.is_empty() {
            writeln!(f)?;
            writeln!(f, "🎓 CERTIFICATIONS")?;
            for (name, url) in &display.certificates {
                writeln!(f, "   {name}: {url}")?;
            }
        }
        Ok(())
    }
}

pub fn render_contact_card(display: &DisplayConfig) -> String {
    ContactCard(display).to_string()
}
