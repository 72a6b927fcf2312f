/// Intrinsic calibration for one physical camera.
///
/// The projection model tag is kept as the raw string from the table; the
/// parameter count is not validated against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera id, unique within a workspace
    pub camera_id: u32,
    /// Projection model tag, e.g. "PINHOLE"
    pub model: String,
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Model parameters, every token after the height column
    pub params: Vec<f64>,
}

/// One posed camera capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image id, unique within a workspace
    pub image_id: u32,
    /// Orientation quaternion
    pub rotation: [f64; 4], // qw, qx, qy, qz
    /// Translation
    pub translation: [f64; 3], // tx, ty, tz
    /// Id of the camera that captured this image, not checked for existence
    pub camera_id: u32,
    /// Image file name, first whitespace token only
    pub name: String,
}

/// One reconstructed scene point.
///
/// The point id present in the source table is not retained; points carry
/// no identity beyond their position in the parsed sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Point3d {
    /// x, y, z coordinates
    pub xyz: [f64; 3],
    /// rgb color
    pub rgb: [u8; 3],
}
