/// ## Summary
/// Computes the strong `ETag` of a card payload: the quoted MD5 hex digest.
///
/// ## Side Effects
///
/// None - pure function.
#[must_use]
pub fn card_etag(data: &[u8]) -> String {
    format!("\"{}\"", hex::encode(md5::compute(data).0))
}
