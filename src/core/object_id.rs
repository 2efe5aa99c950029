//! 标识符编解码
//!
//! 在文档库原生主键 (`ObjectId`) 与 HTTP/JSON 中使用的 24 位十六进制字符串之间转换。

use std::{fmt, str::FromStr};

use bson::oid::ObjectId;

use super::error::CoreError;

/// 对外暴露的文档标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MongoId(ObjectId);

impl MongoId {
    pub fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for MongoId {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| CoreError::InvalidIdentifier(raw.to_string()))
    }
}

impl From<ObjectId> for MongoId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<[u8; 12]> for MongoId {
    fn from(bytes: [u8; 12]) -> Self {
        Self(ObjectId::from_bytes(bytes))
    }
}

/// 始终输出小写的规范形式
impl fmt::Display for MongoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for raw in [
            "507f1f77bcf86cd799439011",
            "000000000000000000000000",
            "ffffffffffffffffffffffff",
            "6530a1b2c3d4e5f601234567",
        ] {
            let id: MongoId = raw.parse().unwrap();
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn test_generated_ids_round_trip() {
        for _ in 0..32 {
            let id = MongoId::new(ObjectId::new());
            let parsed: MongoId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_uppercase_is_canonicalized() {
        let id: MongoId = "507F1F77BCF86CD799439011".parse().unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_rejects_malformed_input() {
        for raw in [
            "",
            "abc",
            "507f1f77bcf86cd79943901",
            "507f1f77bcf86cd7994390111",
            "zzzzzzzzzzzzzzzzzzzzzzzz",
            "507f1f77-bcf8-6cd7-9943-9011",
            "twelve bytes",
        ] {
            match raw.parse::<MongoId>() {
                Err(CoreError::InvalidIdentifier(input)) => assert_eq!(input, raw),
                other => panic!("期望 InvalidIdentifier，实际为 {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_bytes() {
        let id = MongoId::from([0x11; 12]);
        assert_eq!(id.to_string(), "111111111111111111111111");
    }
}
