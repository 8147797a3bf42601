//! Face directive parsing: `p`, `p/t`, `p//n` and `p/t/n` vertex references.

use scene_core::{AttributeKind, LoadError, LoadResult};

use crate::tables::TableCounts;

/// One vertex reference of a face, with 0-based indices.
/// A missing component is `None`, never index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceRef {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceRef {
    pub fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Which of the four reference layouts a token uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RefForm {
    PosTexNormal,
    PosNormal,
    PosTex,
    Pos,
}

/// Form of a token split on `/`. `p//n` is matched before `p/t/n` so an
/// empty texcoord slot is never taken for a value.
fn classify(fields: &[&str]) -> Option<RefForm> {
    let form = match fields {
        [p, ..] if p.is_empty() => return None,
        [_] => RefForm::Pos,
        [_, t] if !t.is_empty() => RefForm::PosTex,
        [_, "", n] if !n.is_empty() => RefForm::PosNormal,
        [_, t, n] if !t.is_empty() && !n.is_empty() => RefForm::PosTexNormal,
        _ => return None,
    };
    Some(form)
}

/// Parse the remainder of an `f` line into references, preserving file order.
pub fn parse_face(rest: &str, counts: TableCounts, line: usize) -> LoadResult<Vec<FaceRef>> {
    rest.split_whitespace()
        .map(|token| parse_face_ref(token, counts, line))
        .collect()
}

pub fn parse_face_ref(token: &str, counts: TableCounts, line: usize) -> LoadResult<FaceRef> {
    let malformed = || LoadError::MalformedFace {
        line,
        token: token.to_owned(),
    };
    let fields: Vec<&str> = token.split('/').collect();
    let (t, n) = match classify(&fields).ok_or_else(malformed)? {
        RefForm::Pos => (None, None),
        RefForm::PosTex => (Some(fields[1]), None),
        RefForm::PosNormal => (None, Some(fields[2])),
        RefForm::PosTexNormal => (Some(fields[1]), Some(fields[2])),
    };

    let field = |raw: &str, attribute: AttributeKind| -> LoadResult<usize> {
        let value = raw.parse::<i64>().map_err(|_| malformed())?;
        resolve_index(value, counts.of(attribute), attribute, line)
    };

    Ok(FaceRef {
        position: field(fields[0], AttributeKind::Position)?,
        texcoord: t.map(|t| field(t, AttributeKind::Texcoord)).transpose()?,
        normal: n.map(|n| field(n, AttributeKind::Normal)).transpose()?,
    })
}

/// Convert a 1-based (or negative, relative-from-end) index to 0-based.
/// Upper bounds are checked when the reference is welded.
fn resolve_index(raw: i64, len: usize, attribute: AttributeKind, line: usize) -> LoadResult<usize> {
    let unresolved = || LoadError::UnresolvedReference {
        line,
        attribute,
        index: raw,
        len,
    };
    let back = usize::try_from(raw.unsigned_abs()).map_err(|_| unresolved())?;
    match raw {
        0 => Err(unresolved()),
        r if r > 0 => Ok(back - 1),
        _ => len.checked_sub(back).ok_or_else(unresolved),
    }
}
