//! Auto-print directive embedding built on top of `lopdf`.

use lopdf::{Dictionary, Document, Object};
use thiserror::Error;

/// Errors that can occur while adding the print action to rendered PDF bytes.
#[derive(Debug, Error)]
pub enum AutoPrintError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("failed to process PDF bytes: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write PDF bytes: {0}")]
    Io(#[from] std::io::Error),
    /// The trailer has no `/Root` reference.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
}

/// Adds `/OpenAction << /S /Named /N /Print >>` to the document catalog.
///
/// Viewers honouring the action open their print dialog as soon as the file
/// is loaded.
pub fn apply_auto_print(pdf_bytes: &[u8]) -> Result<Vec<u8>, AutoPrintError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| AutoPrintError::MissingCatalog)?;

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(AutoPrintError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| AutoPrintError::InvalidCatalog)?;

    let mut action = Dictionary::new();
    action.set("Type", Object::Name("Action".into()));
    action.set("S", Object::Name("Named".into()));
    action.set("N", Object::Name("Print".into()));
    catalog.set("OpenAction", Object::Dictionary(action));

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Reports whether `pdf_bytes` carries a named print open action.
pub fn has_auto_print(pdf_bytes: &[u8]) -> Result<bool, AutoPrintError> {
    let document = Document::load_mem(pdf_bytes)?;
    let catalog = document.catalog().map_err(|_| AutoPrintError::MissingCatalog)?;

    let action = match catalog.get(b"OpenAction").and_then(Object::as_dict) {
        Ok(action) => action,
        Err(_) => return Ok(false),
    };
    let named_print = matches!(action.get(b"S"), Ok(Object::Name(name)) if name == b"Named")
        && matches!(action.get(b"N"), Ok(Object::Name(name)) if name == b"Print");
    Ok(named_print)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn minimal_pdf() -> Vec<u8> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        document.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn embeds_named_print_action() {
        let original = minimal_pdf();
        assert!(!has_auto_print(&original).unwrap());

        let printed = apply_auto_print(&original).unwrap();
        assert!(has_auto_print(&printed).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            apply_auto_print(b"not a pdf"),
            Err(AutoPrintError::Pdf(_))
        ));
    }
}
