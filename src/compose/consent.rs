//! Consent form layout: one page, fixed field positions matching the
//! printed policyholder consent sheet.

use crate::models::ConsentRecord;

use super::application::Slot;
use super::layout::Compositor;
use super::{ComposeError, SignatureImages};

const fn slot(x: f32, y: f32, size: f32) -> Slot {
    Slot { x, y, size }
}

// ─── Field coordinate table ──────────────────────────────────────────────────

mod header {
    use super::{slot, Slot};
    pub const ORG: Slot = slot(170.0, 40.0, 14.0);
    pub const TITLE: Slot = slot(200.0, 60.0, 12.0);
    pub const POLICY_NUMBER: Slot = slot(40.0, 90.0, 10.0);
}

mod holder {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 120.0, 11.0);
    pub const NAME: Slot = slot(40.0, 140.0, 10.0);
    pub const CONTACT: Slot = slot(300.0, 140.0, 10.0);
    pub const ID_NUMBER: Slot = slot(40.0, 160.0, 10.0);
    pub const ADDRESS: Slot = slot(40.0, 180.0, 10.0);
}

mod dependents {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 210.0, 11.0);
    pub const ENTRY_X: f32 = 40.0;
    pub const FIRST_Y: f32 = 230.0;
    pub const LINE_HEIGHT: f32 = 18.0;
    pub const SIZE: f32 = 10.0;
}

mod signatures {
    use super::{slot, Slot};
    pub const BOX_W: f32 = 140.0;
    pub const BOX_H: f32 = 40.0;
    pub const HOLDER: Slot = slot(40.0, 350.0, 10.0);
    pub const HOLDER_CAPTION: Slot = slot(40.0, 405.0, 10.0);
    pub const ADMIN: Slot = slot(300.0, 350.0, 10.0);
    pub const ADMIN_CAPTION: Slot = slot(300.0, 405.0, 10.0);
}

mod footer {
    use super::{slot, Slot};
    pub const MOTTO: Slot = slot(170.0, 780.0, 9.0);
}

const ORG_NAME: &str = "THUSO FUNERAL GROUP";
const MOTTO: &str = "RESPECTFUL | PROFESSIONAL | DIGNIFIED";

/// Blank-tolerant display for dependent cells.
fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Renders a consent record plus up to two signature images into PDF bytes.
/// The `office` signature role is the admin signature on this form.
pub fn compose_consent(
    record: &ConsentRecord,
    signatures: &SignatureImages,
) -> Result<Vec<u8>, ComposeError> {
    let (doc, page) = Compositor::new("Policyholder Consent Form")?;
    let at = |s: Slot, text: &str| page.text(text, s.x, s.y, s.size);

    // Header
    at(header::ORG, ORG_NAME);
    at(header::TITLE, "POLICYHOLDER CONSENT FORM");
    at(
        header::POLICY_NUMBER,
        &format!("Policy Number: {}", record.policy_number),
    );

    // Policyholder
    at(holder::HEADING, "Policyholder:");
    at(holder::NAME, &format!("Name: {}", record.name));
    at(holder::CONTACT, &format!("Contact: {}", record.contact));
    at(holder::ID_NUMBER, &format!("ID Number: {}", record.id_number));
    at(holder::ADDRESS, &format!("Address: {}", record.address));

    // Dependents
    at(dependents::HEADING, "Dependents:");
    for (i, dep) in record.dependents.iter().enumerate() {
        let y = dependents::FIRST_Y + i as f32 * dependents::LINE_HEIGHT;
        page.text(
            &format!(
                "{}. {} | {} | {}",
                i + 1,
                or_dash(&dep.name),
                or_dash(&dep.relationship),
                or_dash(&dep.id_number)
            ),
            dependents::ENTRY_X,
            y,
            dependents::SIZE,
        );
    }

    // Signatures: caption only when the image actually embedded.
    if let Some(bytes) = &signatures.holder {
        let s = signatures::HOLDER;
        if page.image(bytes, s.x, s.y, signatures::BOX_W, signatures::BOX_H) {
            at(signatures::HOLDER_CAPTION, "Policyholder Signature");
        }
    }
    if let Some(bytes) = &signatures.office {
        let s = signatures::ADMIN;
        if page.image(bytes, s.x, s.y, signatures::BOX_W, signatures::BOX_H) {
            at(signatures::ADMIN_CAPTION, "Admin Signature");
        }
    }

    // Footer
    at(footer::MOTTO, MOTTO);

    doc.finish()
}
