use hsg_core::{AppError, AppResult};

use super::ports::RandomSource;

const MAX_REJECTIONS: usize = 64;

/// Random source backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn next_u32(&self) -> AppResult<u32> {
        let mut bytes = [0u8; 4];
        getrandom::fill(&mut bytes).map_err(|error| {
            AppError::Internal(format!("failed to read random bytes: {error}"))
        })?;

        Ok(u32::from_le_bytes(bytes))
    }
}

/// Draws a uniformly distributed value in `min..=max`.
///
/// Uses rejection sampling so that no value in the range is favoured by the
/// modulo reduction.
pub fn sequence_in_range(source: &dyn RandomSource, min: u16, max: u16) -> AppResult<u16> {
    if min > max {
        return Err(AppError::Validation(format!(
            "invalid random range {min}..={max}"
        )));
    }

    let span = u32::from(max - min) + 1;
    let zone = (u32::MAX / span) * span;

    for _ in 0..MAX_REJECTIONS {
        let value = source.next_u32()?;
        if value < zone {
            let offset = u16::try_from(value % span).map_err(|error| {
                AppError::Internal(format!("random offset out of range: {error}"))
            })?;
            return Ok(min + offset);
        }
    }

    Err(AppError::Internal(
        "random source kept producing values outside the sampling zone".to_owned(),
    ))
}
