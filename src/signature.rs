//! JVM method descriptor parsing.
//!
//! Parses the descriptor strings passed to `GetMethodID` / `GetStaticMethodID`
//! (for example `"(ILjava/lang/String;[F)V"`) into a [`JavaSignature`].
//!
//! ```
//! use jni_shadow::signature::{JavaSignature, JavaType};
//!
//! let sig: JavaSignature = "(IF)V".parse().unwrap();
//! assert_eq!(sig.params, vec![JavaType::Int, JavaType::Float]);
//! assert_eq!(sig.ret, JavaType::Void);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::NativeType;

/// Why a descriptor was rejected. Every variant carries the byte offset of
/// the problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("descriptor must start with '(' (found {found:?} at offset {offset})")]
    MissingOpenParen { offset: usize, found: Option<char> },
    #[error("descriptor ended unexpectedly at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("invalid type code {code:?} at offset {offset}")]
    InvalidTypeCode { offset: usize, code: char },
    #[error("class name starting at offset {offset} has no terminating ';'")]
    UnterminatedClassName { offset: usize },
    #[error("empty class name at offset {offset}")]
    EmptyClassName { offset: usize },
    #[error("'V' used as a parameter type at offset {offset}")]
    VoidParameter { offset: usize },
    #[error("unexpected trailing characters at offset {offset}")]
    TrailingCharacters { offset: usize },
}

/// A type from the Java type system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    /// Internal class name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<JavaType>),
}

impl JavaType {
    /// The JNI C type a value of this type is passed as.
    pub fn native_type(&self) -> NativeType {
        match self {
            JavaType::Boolean => NativeType::Boolean,
            JavaType::Byte => NativeType::Byte,
            JavaType::Char => NativeType::Char,
            JavaType::Short => NativeType::Short,
            JavaType::Int => NativeType::Int,
            JavaType::Long => NativeType::Long,
            JavaType::Float => NativeType::Float,
            JavaType::Double => NativeType::Double,
            JavaType::Void => NativeType::Void,
            JavaType::Object(name) => match name.as_str() {
                "java/lang/String" => NativeType::String,
                "java/lang/Class" => NativeType::Class,
                "java/lang/Throwable" => NativeType::Throwable,
                _ => NativeType::Object,
            },
            JavaType::Array(elem) => match **elem {
                JavaType::Boolean => NativeType::BooleanArray,
                JavaType::Byte => NativeType::ByteArray,
                JavaType::Char => NativeType::CharArray,
                JavaType::Short => NativeType::ShortArray,
                JavaType::Int => NativeType::IntArray,
                JavaType::Long => NativeType::LongArray,
                JavaType::Float => NativeType::FloatArray,
                JavaType::Double => NativeType::DoubleArray,
                _ => NativeType::ObjectArray,
            },
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Boolean => f.write_str("Z"),
            JavaType::Byte => f.write_str("B"),
            JavaType::Char => f.write_str("C"),
            JavaType::Short => f.write_str("S"),
            JavaType::Int => f.write_str("I"),
            JavaType::Long => f.write_str("J"),
            JavaType::Float => f.write_str("F"),
            JavaType::Double => f.write_str("D"),
            JavaType::Void => f.write_str("V"),
            JavaType::Object(name) => write!(f, "L{name};"),
            JavaType::Array(elem) => write!(f, "[{elem}"),
        }
    }
}

/// A parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaSignature {
    pub params: Vec<JavaType>,
    pub ret: JavaType,
}

impl JavaSignature {
    pub fn parse(descriptor: &str) -> Result<Self, ParseError> {
        let mut r = Reader::new(descriptor.as_bytes());
        match r.peek() {
            Some(b'(') => r.pos += 1,
            found => {
                return Err(ParseError::MissingOpenParen {
                    offset: 0,
                    found: found.map(char::from),
                })
            }
        }

        let mut params = Vec::new();
        loop {
            match r.peek() {
                Some(b')') => {
                    r.pos += 1;
                    break;
                }
                Some(b'V') => return Err(ParseError::VoidParameter { offset: r.pos }),
                Some(_) => params.push(r.read_field_type()?),
                None => return Err(ParseError::UnexpectedEnd { offset: r.pos }),
            }
        }

        let ret = match r.peek() {
            Some(b'V') => {
                r.pos += 1;
                JavaType::Void
            }
            Some(_) => r.read_field_type()?,
            None => return Err(ParseError::UnexpectedEnd { offset: r.pos }),
        };

        if r.remaining() > 0 {
            return Err(ParseError::TrailingCharacters { offset: r.pos });
        }
        Ok(JavaSignature { params, ret })
    }

    /// Declared parameter types as JNI C types.
    pub fn native_params(&self) -> Vec<NativeType> {
        self.params.iter().map(JavaType::native_type).collect()
    }
}

impl FromStr for JavaSignature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JavaSignature::parse(s)
    }
}

impl fmt::Display for JavaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for p in &self.params {
            write!(f, "{p}")?;
        }
        write!(f, "){}", self.ret)
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn read_u1(&mut self) -> Result<u8, ParseError> {
        let v = self.peek().ok_or(ParseError::UnexpectedEnd { offset: self.pos })?;
        self.pos += 1;
        Ok(v)
    }

    fn read_field_type(&mut self) -> Result<JavaType, ParseError> {
        let offset = self.pos;
        let ty = match self.read_u1()? {
            b'Z' => JavaType::Boolean,
            b'B' => JavaType::Byte,
            b'C' => JavaType::Char,
            b'S' => JavaType::Short,
            b'I' => JavaType::Int,
            b'J' => JavaType::Long,
            b'F' => JavaType::Float,
            b'D' => JavaType::Double,
            b'L' => self.read_class_name()?,
            b'[' => {
                if self.peek() == Some(b'V') {
                    return Err(ParseError::VoidParameter { offset: self.pos });
                }
                JavaType::Array(Box::new(self.read_field_type()?))
            }
            other => {
                return Err(ParseError::InvalidTypeCode {
                    offset,
                    code: char::from(other),
                })
            }
        };
        Ok(ty)
    }

    fn read_class_name(&mut self) -> Result<JavaType, ParseError> {
        let start = self.pos;
        let len = self.data[start..]
            .iter()
            .position(|&b| b == b';')
            .ok_or(ParseError::UnterminatedClassName { offset: start })?;
        if len == 0 {
            return Err(ParseError::EmptyClassName { offset: start });
        }
        let name = String::from_utf8_lossy(&self.data[start..start + len]).into_owned();
        self.pos = start + len + 1;
        Ok(JavaType::Object(name))
    }
}
