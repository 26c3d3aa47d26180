use std::fmt;

use crate::error::ValidationError;
use crate::{
    EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE,
};

/// A single record of the fixed `(id, username, email)` schema.
///
/// Text columns are stored as zero padded byte arrays of their full column
/// width, so a row is always exactly `ROW_SIZE` bytes once serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Row {
    id: i32,
    username: [u8; USERNAME_SIZE],
    email: [u8; EMAIL_SIZE],
}

impl Row {
    pub fn new(id: i32, username: &str, email: &str) -> Result<Self, ValidationError> {
        if id < 0 {
            return Err(ValidationError::NegativeId);
        }
        Ok(Self {
            id,
            username: fixed_column(username)?,
            email: fixed_column(email)?,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> String {
        column_text(&self.username)
    }

    pub fn email(&self) -> String {
        column_text(&self.email)
    }

    /// Writes the row into `dst`, which must be exactly `ROW_SIZE` bytes.
    pub fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(dst.len(), ROW_SIZE, "row slot has the wrong size");
        dst[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        dst[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE].copy_from_slice(&self.username);
        dst[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE].copy_from_slice(&self.email);
    }

    /// Reads a row back from a `ROW_SIZE` byte slot.
    pub fn deserialize(src: &[u8]) -> Self {
        assert_eq!(src.len(), ROW_SIZE, "row slot has the wrong size");
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]);
        let mut username = [0u8; USERNAME_SIZE];
        username.copy_from_slice(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);
        let mut email = [0u8; EMAIL_SIZE];
        email.copy_from_slice(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);

        Self {
            id: i32::from_le_bytes(id),
            username,
            email,
        }
    }
}

fn fixed_column<const N: usize>(value: &str) -> Result<[u8; N], ValidationError> {
    let bytes = value.as_bytes();
    if bytes.len() > N {
        return Err(ValidationError::StringTooLong);
    }
    let mut column = [0u8; N];
    column[..bytes.len()].copy_from_slice(bytes);
    Ok(column)
}

fn column_text(column: &[u8]) -> String {
    let end = column.iter().position(|&b| b == 0).unwrap_or(column.len());
    String::from_utf8_lossy(&column[..end]).into_owned()
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username(), self.email())
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("username", &self.username())
            .field("email", &self.email())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_then_deserialize_gives_back_the_row() {
        let row = Row::new(42, "user42", "person42@example.com").unwrap();
        let mut slot = [0u8; ROW_SIZE];
        row.serialize(&mut slot);

        let decoded = Row::deserialize(&slot);
        assert_eq!(decoded, row);
        assert_eq!(decoded.username(), "user42");
        assert_eq!(decoded.email(), "person42@example.com");
    }

    #[test]
    fn fields_land_at_fixed_offsets() {
        let row = Row::new(0x0102_0304, "ab", "c").unwrap();
        let mut slot = [0xffu8; ROW_SIZE];
        row.serialize(&mut slot);

        assert_eq!(&slot[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&slot[4..6], b"ab");
        assert!(slot[6..36].iter().all(|&b| b == 0));
        assert_eq!(slot[36], b'c');
        assert!(slot[37..].iter().all(|&b| b == 0));
    }

    #[test]
    fn full_width_columns_are_kept_whole() {
        let username = "u".repeat(USERNAME_SIZE);
        let email = "e".repeat(EMAIL_SIZE);
        let row = Row::new(i32::MAX, &username, &email).unwrap();
        let mut slot = [0u8; ROW_SIZE];
        row.serialize(&mut slot);

        let decoded = Row::deserialize(&slot);
        assert_eq!(decoded.id(), i32::MAX);
        assert_eq!(decoded.username(), username);
        assert_eq!(decoded.email(), email);
    }

    #[test]
    fn overlong_columns_are_rejected() {
        let username = "u".repeat(USERNAME_SIZE + 1);
        let email = "e".repeat(EMAIL_SIZE + 1);
        assert_eq!(
            Row::new(1, &username, "a@b").unwrap_err(),
            ValidationError::StringTooLong
        );
        assert_eq!(
            Row::new(1, "user", &email).unwrap_err(),
            ValidationError::StringTooLong
        );
    }

    #[test]
    fn multibyte_text_counts_bytes() {
        // 11 three-byte characters = 33 bytes
        let username = "\u{3042}".repeat(11);
        assert_eq!(
            Row::new(1, &username, "a@b").unwrap_err(),
            ValidationError::StringTooLong
        );
    }

    #[test]
    fn negative_id_is_rejected() {
        assert_eq!(
            Row::new(-1, "user", "a@b").unwrap_err(),
            ValidationError::NegativeId
        );
    }

    #[test]
    fn display_matches_select_output() {
        let row = Row::new(1, "user1", "person1@example.com").unwrap();
        assert_eq!(row.to_string(), "(1, user1, person1@example.com)");
    }
}
