use serde::{Deserialize, Serialize};

/// Image shown for every tile that is face down.
pub const FACE_DOWN_IMAGE: &str = "Carta-Bocaabajo.png";

pub const CARD_IMAGES: [&str; 12] = [
    "Carta-AgencyFB-1.png",
    "Carta-ArialBlack-1.png",
    "Carta-Bauhaus93-1.png",
    "Carta-Broadway-1.png",
    "Carta-Calibri-1.png",
    "Carta-ComicSansMS-1.png",
    "Carta-LithosPro-1.png",
    "Carta-Mistral-1.png",
    "Carta-OpenSans-1.png",
    "Carta-SegoeUI-1.png",
    "Carta-SourceSansPro-1.png",
    "CartaStrangeloEdessa.png",
];

/// Identifies one card face; an index into [`CARD_IMAGES`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub usize);

impl CardId {
    pub fn image(&self) -> Option<&'static str> {
        CARD_IMAGES.get(self.0).copied()
    }

    /// Font name printed on the card, e.g. "ComicSansMS" for `Carta-ComicSansMS-1.png`.
    pub fn label(&self) -> String {
        match self.image() {
            Some(image) => image
                .trim_end_matches(".png")
                .trim_end_matches("-1")
                .trim_start_matches("Carta-")
                .trim_start_matches("Carta")
                .to_string(),
            None => format!("card{}", self.0),
        }
    }
}

/// The first `pair_count` card faces of the catalog, clamped to what the catalog holds.
pub fn catalog(pair_count: usize) -> Vec<CardId> {
    let pair_count = pair_count.clamp(1, CARD_IMAGES.len());
    (0..pair_count).map(CardId).collect()
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
