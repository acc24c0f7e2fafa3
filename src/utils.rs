use crate::entities::{FileItem, Perm, VolumeStatus};
use byte_unit::{Byte, UnitType};

impl FileItem {
    /// Human-readable size, empty for folders or when size wasn't requested
    #[must_use]
    pub fn calculate_size(&self) -> String {
        if self.isdir {
            return String::new();
        }
        self.additional
            .as_ref()
            .and_then(|additional| additional.size)
            .map(format_bytes)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.additional
            .as_ref()
            .and_then(|additional| additional.volume_status.as_ref())
            .is_some_and(|status| status.readonly)
    }
}

impl VolumeStatus {
    #[must_use]
    pub fn calculate_free_space(&self) -> String {
        format_bytes(self.freespace)
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate_usage(&self) -> f64 {
        if self.totalspace == 0 {
            return 0.0;
        }
        let used = self.totalspace.saturating_sub(self.freespace);
        (used as f64 / self.totalspace as f64 * 100.0).round()
    }
}

impl Perm {
    /// `rwxr-xr-x` style rendering of the POSIX mode
    #[must_use]
    pub fn posix_string(&self) -> String {
        posix_to_string(self.posix)
    }
}

#[must_use]
pub fn format_bytes(size: u64) -> String {
    let size = Byte::from(size);
    format!("{:#.2}", size.get_appropriate_unit(UnitType::Decimal))
}

/// Renders a mode written as decimal digits (`755`) as `rwxr-xr-x`
#[must_use]
pub fn posix_to_string(mode: u32) -> String {
    let digits = [mode / 100 % 10, mode / 10 % 10, mode % 10];
    digits
        .iter()
        .map(|digit| {
            let digit = digit & 0b111;
            [(4, 'r'), (2, 'w'), (1, 'x')]
                .iter()
                .map(|(bit, c)| if digit & bit != 0 { *c } else { '-' })
                .collect::<String>()
        })
        .collect()
}
