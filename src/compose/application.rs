//! Application form layout: one page, fixed field positions matching the
//! printed THUSO FUNERAL GROUP application sheet.

use crate::models::ApplicationRecord;

use super::layout::Compositor;
use super::{ComposeError, SignatureImages};

/// Fixed placement of one field: x, y from the page top, font size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

const fn slot(x: f32, y: f32, size: f32) -> Slot {
    Slot { x, y, size }
}

// ─── Field coordinate table ──────────────────────────────────────────────────
// Grouped by section, drawn top to bottom. Values match the printed form.

mod header {
    use super::{slot, Slot};
    pub const TITLE: Slot = slot(230.0, 60.0, 12.0);
    pub const POLICY_NO: Slot = slot(40.0, 90.0, 10.0);
    pub const PLAN: Slot = slot(300.0, 90.0, 10.0);
    pub const PREMIUM: Slot = slot(450.0, 90.0, 10.0);
}

mod holder {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 120.0, 10.0);
    pub const TITLE: Slot = slot(40.0, 140.0, 10.0);
    pub const STATUS: Slot = slot(150.0, 140.0, 10.0);
    pub const SEX: Slot = slot(280.0, 140.0, 10.0);
    pub const SURNAME: Slot = slot(40.0, 160.0, 10.0);
    pub const FIRST_NAME: Slot = slot(280.0, 160.0, 10.0);
    pub const CELL_NO: Slot = slot(40.0, 180.0, 10.0);
    pub const ID_NUMBER: Slot = slot(280.0, 180.0, 10.0);
    pub const ADDRESS: Slot = slot(40.0, 200.0, 10.0);
}

mod dependents {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 230.0, 10.0);
    pub const ENTRY_X: f32 = 60.0;
    pub const FIRST_Y: f32 = 250.0;
    pub const LINE_HEIGHT: f32 = 20.0;
    pub const SIZE: f32 = 10.0;
}

mod beneficiary {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 370.0, 10.0);
    pub const NAME: Slot = slot(60.0, 390.0, 10.0);
    pub const ID: Slot = slot(300.0, 390.0, 10.0);
}

mod office_use {
    use super::{slot, Slot};
    pub const HEADING: Slot = slot(40.0, 420.0, 10.0);
    pub const CAPTURER: Slot = slot(60.0, 440.0, 10.0);
    pub const CHECKED_BY: Slot = slot(250.0, 440.0, 10.0);
    pub const QUALIFYING_DATE: Slot = slot(420.0, 440.0, 10.0);
}

mod signatures {
    use super::{slot, Slot};
    pub const BOX_W: f32 = 120.0;
    pub const BOX_H: f32 = 40.0;
    pub const HOLDER: Slot = slot(40.0, 480.0, 10.0);
    pub const HOLDER_CAPTION: Slot = slot(40.0, 500.0, 10.0);
    pub const OFFICE: Slot = slot(240.0, 480.0, 10.0);
    pub const OFFICE_CAPTION: Slot = slot(240.0, 500.0, 10.0);
}

mod footer {
    use super::{slot, Slot};
    pub const MOTTO: Slot = slot(170.0, 800.0, 10.0);
    pub const OFFICE_LINE: Slot = slot(40.0, 815.0, 8.0);
    pub const CONTACT_LINE: Slot = slot(120.0, 830.0, 8.0);
}

const MOTTO: &str = "RESPECTFUL | PROFESSIONAL | DIGNIFIED";
const OFFICE_LINE: &str =
    "Head Office Phuthaditjhaba - Tel: 058 000 0000 - Cell/WhatsApp: 071 000 0000";
const CONTACT_LINE: &str = "Email: info@thusofunerals.example | www.thusofunerals.example | FSP 00000";

/// Renders an application record plus up to two signature images into PDF
/// bytes. The record is read only; absent values draw as blank fields.
pub fn compose_application(
    record: &ApplicationRecord,
    signatures: &SignatureImages,
) -> Result<Vec<u8>, ComposeError> {
    let (doc, page) = Compositor::new("Application Form")?;
    let at = |s: Slot, text: &str| page.text(text, s.x, s.y, s.size);

    // Header
    at(header::TITLE, "APPLICATION FORM");
    at(header::POLICY_NO, &format!("POLICY NO: {}", record.policy_no));
    at(
        header::PLAN,
        &format!("PLAN: {}", record.plan.map(|p| p.as_str()).unwrap_or("")),
    );
    at(header::PREMIUM, &format!("MONTHLY PREMIUM: R {}", record.premium));

    // Policy holder
    at(holder::HEADING, "1. DETAILS OF POLICY HOLDER");
    at(holder::TITLE, &format!("Title: {}", record.title));
    at(holder::STATUS, &format!("Status: {}", record.status));
    at(holder::SEX, &format!("Sex: {}", record.sex));
    at(holder::SURNAME, &format!("Surname: {}", record.surname));
    at(holder::FIRST_NAME, &format!("First Name: {}", record.first_name));
    at(holder::CELL_NO, &format!("Cell No: {}", record.cell_no));
    at(holder::ID_NUMBER, &format!("ID Number: {}", record.id_number));
    at(holder::ADDRESS, &format!("Address: {}", record.residential_address));

    // Dependents: one line per entry, input order; unused slots draw nothing.
    at(dependents::HEADING, "2. DEPENDENTS");
    for (i, dep) in record.dependents.iter().enumerate() {
        let y = dependents::FIRST_Y + i as f32 * dependents::LINE_HEIGHT;
        page.text(
            &format!(
                "{}. {} {} {} {}",
                i + 1,
                dep.id_number,
                dep.surname,
                dep.name,
                dep.relationship
            ),
            dependents::ENTRY_X,
            y,
            dependents::SIZE,
        );
    }

    // Beneficiary
    at(beneficiary::HEADING, "3. NOMINATED BENEFICIARY");
    let bene = record.beneficiary.clone().unwrap_or_default();
    at(beneficiary::NAME, &format!("Name: {}", bene.name));
    at(beneficiary::ID, &format!("ID: {}", bene.id_number));

    // Office use
    at(office_use::HEADING, "4. FOR OFFICE USE ONLY");
    at(office_use::CAPTURER, &format!("Capturer: {}", record.capturer));
    at(office_use::CHECKED_BY, &format!("Checked By: {}", record.checked_by));
    at(
        office_use::QUALIFYING_DATE,
        &format!("Qualifying Date: {}", record.qualifying_date),
    );

    // Footer
    at(footer::MOTTO, MOTTO);
    at(footer::OFFICE_LINE, OFFICE_LINE);
    at(footer::CONTACT_LINE, CONTACT_LINE);

    // Signatures: caption only when the image actually embedded.
    if let Some(bytes) = &signatures.holder {
        let s = signatures::HOLDER;
        if page.image(bytes, s.x, s.y, signatures::BOX_W, signatures::BOX_H) {
            at(signatures::HOLDER_CAPTION, "Policy Holder Signature");
        }
    }
    if let Some(bytes) = &signatures.office {
        let s = signatures::OFFICE;
        if page.image(bytes, s.x, s.y, signatures::BOX_W, signatures::BOX_H) {
            at(signatures::OFFICE_CAPTION, "Office Signature");
        }
    }

    doc.finish()
}
