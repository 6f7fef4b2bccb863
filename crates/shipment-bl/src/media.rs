/// Media types the extractor backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }
}

fn from_essence(essence: &str) -> Option<MediaType> {
    match essence {
        "application/pdf" => Some(MediaType::Pdf),
        "image/png" => Some(MediaType::Png),
        "image/jpeg" => Some(MediaType::Jpeg),
        "image/webp" => Some(MediaType::Webp),
        _ => None,
    }
}

/// Determines media type from an advertised content type first, then the
/// filename extension, defaulting to PDF when neither is conclusive.
pub fn detect(content_type: Option<&str>, filename: Option<&str>) -> MediaType {
    if let Some(mt) = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .and_then(|ct| from_essence(ct.essence_str()))
    {
        return mt;
    }

    if let Some(mt) = filename
        .map(mime_guess::from_path)
        .and_then(|guess| guess.first())
        .and_then(|mt| from_essence(mt.essence_str()))
    {
        return mt;
    }

    MediaType::Pdf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_wins_over_filename() {
        assert_eq!(detect(Some("image/png"), Some("scan.pdf")), MediaType::Png);
    }

    #[test]
    fn falls_back_to_filename() {
        assert_eq!(detect(None, Some("bill.jpeg")), MediaType::Jpeg);
    }

    #[test]
    fn defaults_to_pdf() {
        assert_eq!(detect(None, None), MediaType::Pdf);
        assert_eq!(detect(Some("text/plain"), Some("bill.docx")), MediaType::Pdf);
    }
}
