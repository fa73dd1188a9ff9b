// src/fetch/urls.rs

use url::{ParseError, Url};

use crate::config::{Position, Scoring};

/// `nfl/stats/{position}.php?scoring={scoring}`
pub fn stats_url(base: &Url, position: Position, scoring: Scoring) -> Result<Url, ParseError> {
    let mut url = base.join(&format!("nfl/stats/{}.php", position.slug()))?;
    url.query_pairs_mut().append_pair("scoring", scoring.as_str());
    Ok(url)
}

/// ADP pages encode scoring in the file name. Quarterbacks have a single
/// page regardless of scoring.
pub fn adp_url(base: &Url, position: Position, scoring: Scoring) -> Result<Url, ParseError> {
    let page = match (position, scoring) {
        (Position::Qb, _) => "qb.php".to_string(),
        (p, Scoring::Standard) => format!("{}.php", p.slug()),
        (p, Scoring::HalfPpr) => format!("half-point-ppr-{}.php", p.slug()),
        (p, Scoring::Ppr) => format!("ppr-{}.php", p.slug()),
    };
    base.join(&format!("nfl/adp/{}", page))
}
