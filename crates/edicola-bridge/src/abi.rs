//! Minimal ABI codec for the storefront contract
//!
//! The contract surface is small and fixed, so this codec covers exactly
//! what it needs: Keccak-256 selectors, word encoding for address, uint256
//! and string arguments, and word decoding for the return shapes the bridge
//! reads (bool, uint, address, string, address[], and the
//! `(address, string, uint256)` magazine tuple).

use edicola_types::{Address, EdicolaError, Result};
use sha3::{Digest, Keccak256};

/// One ABI word
pub const WORD: usize = 32;

/// A call argument
#[derive(Debug, Clone)]
pub enum Token {
    Address(Address),
    Uint(u128),
    Str(String),
}

/// First four bytes of the Keccak-256 of the signature
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Full Keccak-256 of an event signature, as a 0x-prefixed topic
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(Keccak256::digest(signature.as_bytes())))
}

/// Encode a method call: selector followed by head/tail argument encoding
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut head = Vec::with_capacity(args.len() * WORD);
    let mut tail: Vec<u8> = Vec::new();
    let head_len = args.len() * WORD;

    for arg in args {
        match arg {
            Token::Address(addr) => head.extend_from_slice(&encode_address(addr)),
            Token::Uint(value) => head.extend_from_slice(&encode_uint(*value)),
            Token::Str(s) => {
                // dynamic: head holds the offset from the start of the args
                head.extend_from_slice(&encode_uint((head_len + tail.len()) as u128));
                tail.extend_from_slice(&encode_uint(s.len() as u128));
                tail.extend_from_slice(s.as_bytes());
                let pad = (WORD - s.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

fn encode_address(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    // validated at construction, 20 bytes of hex after the prefix
    let bytes = hex::decode(&address.as_str()[2..]).unwrap_or_default();
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    word
}

fn encode_uint(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn malformed(context: &str) -> EdicolaError {
    EdicolaError::ChainUnavailable(format!("malformed node response: {context}"))
}

/// Decode 0x-prefixed hex return data into bytes
pub fn decode_hex(data: &str) -> Result<Vec<u8>> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|_| malformed("bad hex"))
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8]> {
    let start = index * WORD;
    data.get(start..start + WORD)
        .ok_or_else(|| malformed("short return data"))
}

/// Decode the uint256 word at `index` (values above u128 are out of scope)
pub fn decode_uint(data: &[u8], index: usize) -> Result<u128> {
    let word = word_at(data, index)?;
    if word[..WORD - 16].iter().any(|&b| b != 0) {
        return Err(malformed("uint overflows u128"));
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&word[WORD - 16..]);
    Ok(u128::from_be_bytes(bytes))
}

/// Decode the bool word at `index`
pub fn decode_bool(data: &[u8], index: usize) -> Result<bool> {
    Ok(decode_uint(data, index)? != 0)
}

/// Decode the address word at `index`
pub fn decode_address(data: &[u8], index: usize) -> Result<Address> {
    let word = word_at(data, index)?;
    Address::parse(&format!("0x{}", hex::encode(&word[WORD - 20..])))
        .map_err(|_| malformed("bad address word"))
}

/// Whether the address word at `index` is the zero address
pub fn is_zero_address(data: &[u8], index: usize) -> Result<bool> {
    Ok(word_at(data, index)?[WORD - 20..].iter().all(|&b| b == 0))
}

/// Decode the dynamic string whose offset sits at `index`
pub fn decode_string(data: &[u8], index: usize) -> Result<String> {
    let offset = decode_uint(data, index)? as usize;
    let len_word = data
        .get(offset..offset + WORD)
        .ok_or_else(|| malformed("string offset out of range"))?;
    let mut len_bytes = [0u8; 16];
    len_bytes.copy_from_slice(&len_word[WORD - 16..]);
    let len = u128::from_be_bytes(len_bytes) as usize;
    let bytes = data
        .get(offset + WORD..offset + WORD + len)
        .ok_or_else(|| malformed("string length out of range"))?;
    String::from_utf8(bytes.to_vec()).map_err(|_| malformed("non-utf8 string"))
}

/// Decode the dynamic `address[]` whose offset sits at word 0
pub fn decode_address_array(data: &[u8]) -> Result<Vec<Address>> {
    let offset = decode_uint(data, 0)? as usize;
    if offset % WORD != 0 {
        return Err(malformed("misaligned array offset"));
    }
    let base = offset / WORD;
    let len = decode_uint(data, base)? as usize;
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(decode_address(data, base + 1 + i)?);
    }
    Ok(out)
}

/// Decode the `(address, string, uint256)` magazine return shape
pub fn decode_magazine(data: &[u8]) -> Result<(Address, String, u64)> {
    let address = decode_address(data, 0)?;
    let title = decode_string(data, 1)?;
    let release_date = decode_uint(data, 2)?;
    let release_date =
        u64::try_from(release_date).map_err(|_| malformed("release date overflows u64"))?;
    Ok((address, title, release_date))
}

/// Selector of the canonical `Error(string)` revert payload
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Extract the reason string from `Error(string)` revert data, if present
pub fn decode_revert_reason(data: &str) -> Option<String> {
    let bytes = decode_hex(data).ok()?;
    if bytes.len() < 4 || bytes[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    decode_string(&bytes[4..], 0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_selector_known_vector() {
        // canonical ERC-20 transfer selector
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_storefront_selectors() {
        assert_eq!(hex::encode(selector("countMagazines()")), "3f72aa30");
        assert_eq!(hex::encode(selector("magazines(uint256)")), "d120b0a9");
        assert_eq!(hex::encode(selector("magazineByAddress(address)")), "cd017907");
        assert_eq!(hex::encode(selector("buyMagazine(address)")), "6ddfacbf");
        assert_eq!(hex::encode(selector("annualSubscribe()")), "8b2f81f3");
    }

    #[test]
    fn test_encode_static_args() {
        let data = encode_call("buyMagazine(address)", &[Token::Address(addr(5))]);
        assert_eq!(data.len(), 4 + WORD);
        assert_eq!(&data[..4], &selector("buyMagazine(address)"));
        assert_eq!(data[4 + WORD - 1], 5);
        assert!(data[4..4 + WORD - 1].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_string_arg() {
        let data = encode_call("addMagazine(string)", &[Token::Str("Issue 7".into())]);
        let body = &data[4..];
        // head: offset 0x20, tail: length + padded bytes
        assert_eq!(decode_uint(body, 0).unwrap(), 32);
        assert_eq!(decode_string(body, 0).unwrap(), "Issue 7");
        assert_eq!(body.len(), 3 * WORD);
    }

    #[test]
    fn test_decode_magazine_tuple() {
        // hand-built return: address, offset to title, release date, title tail
        let mut data = Vec::new();
        data.extend_from_slice(&encode_address(&addr(9)));
        data.extend_from_slice(&encode_uint(96));
        data.extend_from_slice(&encode_uint(1_733_011_200_000));
        data.extend_from_slice(&encode_uint(4));
        data.extend_from_slice(b"Tech");
        data.extend(std::iter::repeat(0u8).take(28));

        let (address, title, release_date) = decode_magazine(&data).unwrap();
        assert_eq!(address, addr(9));
        assert_eq!(title, "Tech");
        assert_eq!(release_date, 1_733_011_200_000);
    }

    #[test]
    fn test_decode_address_array() {
        let mut data = Vec::new();
        data.extend_from_slice(&encode_uint(32));
        data.extend_from_slice(&encode_uint(2));
        data.extend_from_slice(&encode_address(&addr(1)));
        data.extend_from_slice(&encode_address(&addr(2)));
        assert_eq!(decode_address_array(&data).unwrap(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_decode_empty_address_array() {
        let mut data = Vec::new();
        data.extend_from_slice(&encode_uint(32));
        data.extend_from_slice(&encode_uint(0));
        assert!(decode_address_array(&data).unwrap().is_empty());
    }

    #[test]
    fn test_decode_revert_reason() {
        let reason = b"Magazine already owned";
        let mut payload = Vec::new();
        payload.extend_from_slice(&ERROR_STRING_SELECTOR);
        payload.extend_from_slice(&encode_uint(32));
        payload.extend_from_slice(&encode_uint(reason.len() as u128));
        payload.extend_from_slice(reason);
        payload.extend(std::iter::repeat(0u8).take((WORD - reason.len() % WORD) % WORD));
        let hexed = format!("0x{}", hex::encode(&payload));
        assert_eq!(
            decode_revert_reason(&hexed).as_deref(),
            Some("Magazine already owned")
        );
    }

    #[test]
    fn test_short_data_is_categorized() {
        match decode_uint(&[0u8; 8], 0) {
            Err(EdicolaError::ChainUnavailable(_)) => {}
            other => panic!("expected ChainUnavailable, got {other:?}"),
        }
    }
}
