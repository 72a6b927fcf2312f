use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use super::{Camera, Image, Point3d};

/// Error types for the COLMAP text tables.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Error reading the table file
    #[error("error reading the table file")]
    Io(#[from] std::io::Error),

    /// A token failed to convert to its expected numeric type
    #[error("invalid token `{token}` at line {line}: {message}")]
    InvalidToken {
        /// Offending token text
        token: String,
        /// 1-based line number in the source file
        line: usize,
        /// Conversion failure detail
        message: String,
    },
}

/// Outcome of parsing one table file.
///
/// Lines with too few tokens are dropped rather than failing the parse;
/// their 1-based line numbers are accumulated in `skipped` so callers can
/// observe the degradation. Comment and blank lines are not reported.
#[derive(Debug, Default, PartialEq)]
pub struct TableParse<T> {
    /// The decoded records
    pub records: T,
    /// Line numbers of malformed lines that were dropped
    pub skipped: Vec<usize>,
}

fn parse_token<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, FormatError>
where
    T::Err: std::fmt::Display,
{
    token.parse::<T>().map_err(|e| FormatError::InvalidToken {
        token: token.to_string(),
        line,
        message: e.to_string(),
    })
}

/// Read a table file into (line number, content) pairs, dropping blank
/// lines and lines whose first non-whitespace character is `#`.
///
/// Returns `None` when the file does not exist; an absent table is an
/// empty table, not an error.
fn read_table_lines(path: &Path) -> Result<Option<Vec<(usize, String)>>, FormatError> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);

    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((idx + 1, trimmed.to_string()));
    }
    Ok(Some(lines))
}

/// Read a cameras.txt file and return the cameras keyed by camera id.
///
/// Line layout is `CAMERA_ID MODEL WIDTH HEIGHT PARAMS[0] PARAMS[1] ...`
/// where the number of parameters depends on the camera model. A line with
/// fewer than 5 tokens is dropped; a token that fails numeric conversion
/// aborts the parse with [`FormatError::InvalidToken`]. A repeated camera
/// id overwrites the earlier record.
pub fn read_cameras_txt(
    path: impl AsRef<Path>,
) -> Result<TableParse<HashMap<u32, Camera>>, FormatError> {
    let mut out = TableParse::default();
    let Some(lines) = read_table_lines(path.as_ref())? else {
        return Ok(out);
    };

    for (lineno, line) in lines {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 5 {
            log::debug!("cameras.txt: dropping short line {lineno}");
            out.skipped.push(lineno);
            continue;
        }
        let camera = Camera {
            camera_id: parse_token(tokens[0], lineno)?,
            model: tokens[1].to_string(),
            width: parse_token(tokens[2], lineno)?,
            height: parse_token(tokens[3], lineno)?,
            params: tokens[4..]
                .iter()
                .map(|t| parse_token(t, lineno))
                .collect::<Result<Vec<_>, _>>()?,
        };
        out.records.insert(camera.camera_id, camera);
    }
    Ok(out)
}

/// Read an images.txt file and return the posed images keyed by image id.
///
/// After comment and blank lines are removed, records span two lines each:
/// a pose line `IMAGE_ID QW QX QY QZ TX TY TZ CAMERA_ID NAME` followed by a
/// 2D-observation line that is discarded without parsing. A malformed pose
/// line drops the whole pair; pairing is never re-synchronized. A trailing
/// pose line without its observation line is still parsed.
pub fn read_images_txt(
    path: impl AsRef<Path>,
) -> Result<TableParse<HashMap<u32, Image>>, FormatError> {
    let mut out = TableParse::default();
    let Some(lines) = read_table_lines(path.as_ref())? else {
        return Ok(out);
    };

    for pair in lines.chunks(2) {
        let (lineno, pose) = &pair[0];
        let tokens = pose.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 9 {
            log::debug!("images.txt: dropping short pose line {lineno}");
            out.skipped.push(*lineno);
            continue;
        }
        // The name column can legitimately be missing on a 9-token line;
        // drop the pair instead of indexing past the end.
        let Some(name) = tokens.get(9) else {
            log::debug!("images.txt: dropping pose line {lineno} without a name");
            out.skipped.push(*lineno);
            continue;
        };
        let image = Image {
            image_id: parse_token(tokens[0], *lineno)?,
            rotation: [
                parse_token(tokens[1], *lineno)?,
                parse_token(tokens[2], *lineno)?,
                parse_token(tokens[3], *lineno)?,
                parse_token(tokens[4], *lineno)?,
            ],
            translation: [
                parse_token(tokens[5], *lineno)?,
                parse_token(tokens[6], *lineno)?,
                parse_token(tokens[7], *lineno)?,
            ],
            camera_id: parse_token(tokens[8], *lineno)?,
            name: (*name).to_string(),
        };
        out.records.insert(image.image_id, image);
    }
    Ok(out)
}

/// Read a points3D.txt file and return the points in file order.
///
/// Line layout is `POINT3D_ID X Y Z R G B ...`; the point id and any
/// trailing reprojection-error and track columns are discarded. A line
/// with fewer than 7 tokens is dropped.
pub fn read_points3d_txt(path: impl AsRef<Path>) -> Result<TableParse<Vec<Point3d>>, FormatError> {
    let mut out = TableParse::default();
    let Some(lines) = read_table_lines(path.as_ref())? else {
        return Ok(out);
    };

    for (lineno, line) in lines {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 7 {
            log::debug!("points3D.txt: dropping short line {lineno}");
            out.skipped.push(lineno);
            continue;
        }
        out.records.push(Point3d {
            xyz: [
                parse_token(tokens[1], lineno)?,
                parse_token(tokens[2], lineno)?,
                parse_token(tokens[3], lineno)?,
            ],
            rgb: [
                parse_token(tokens[4], lineno)?,
                parse_token(tokens[5], lineno)?,
                parse_token(tokens[6], lineno)?,
            ],
        });
    }
    Ok(out)
}
