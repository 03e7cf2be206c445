//! Transaction output with a koinu value and locking script.

use doge_primitives::util::{WireReader, WireWriter};
use doge_script::{Address, Script};

use crate::koinu::Koinu;
use crate::TransactionError;

/// Smallest possible encoded output: value and an empty script.
pub(crate) const MIN_OUTPUT_LEN: usize = 8 + 1;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field          | Size          |
/// |----------------|---------------|
/// | value          | 8 bytes (LE)  |
/// | script length  | compact size  |
/// | locking_script | variable      |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The amount locked by this output.
    pub value: Koinu,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub locking_script: Script,
}

impl TransactionOutput {
    /// Create an output from a value and locking script.
    pub fn new(value: Koinu, locking_script: Script) -> Self {
        TransactionOutput { value, locking_script }
    }

    /// Create a P2PKH output paying `address`.
    pub fn pay_to(address: &Address, value: Koinu) -> Self {
        Self::new(value, address.locking_script())
    }

    /// Deserialize a `TransactionOutput` from a `WireReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded output.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)` on success, or a `SerializationError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading value: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value: Koinu(value),
            locking_script: Script::from(script_bytes),
        })
    }

    /// Serialize this `TransactionOutput` into a `WireWriter`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u64_le(self.value.0);
        writer.write_var_bytes(self.locking_script.to_bytes());
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// `true` if the locking script is a standard P2PKH script.
    pub fn is_p2pkh(&self) -> bool {
        self.locking_script.is_p2pkh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay_to_bytes() {
        let addr = Address::from_string("nbGfXLskPh7eM1iG5zz5EfDkkNTo9TRmde").unwrap();
        let out = TransactionOutput::pay_to(&addr, Koinu::from_coins_str("5").unwrap());
        assert_eq!(
            hex::encode(out.to_bytes()),
            "0065cd1d000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac"
        );
        assert!(out.is_p2pkh());
    }

    #[test]
    fn test_change_value_bytes() {
        let out = TransactionOutput::new(Koinu(699_774_000), Script::new());
        assert_eq!(hex::encode(&out.to_bytes()[..8]), "30b4b52900000000");
    }

    #[test]
    fn test_truncated_output() {
        let bytes = hex::decode("0065cd1d00000000").unwrap();
        let mut r = WireReader::new(&bytes);
        assert!(TransactionOutput::read_from(&mut r).is_err());
        assert_eq!(MIN_OUTPUT_LEN, 9);
    }
}
