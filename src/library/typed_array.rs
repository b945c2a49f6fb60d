//! Typed arrays, written element by element as numbers.
//!
//! Elements are converted the way typed-array stores convert numbers: integer
//! kinds truncate and wrap modulo their width (`NaN` and infinities become `0`),
//! `Uint8ClampedArray` clamps to `0..=255` rounding half to even, and
//! `Float32Array` rounds to single precision.

use super::{slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Object, Slot, Value};

pub static INT8_ARRAY: Class = Class::new("Int8Array");
pub static UINT8_ARRAY: Class = Class::new("Uint8Array");
pub static UINT8_CLAMPED_ARRAY: Class = Class::new("Uint8ClampedArray");
pub static INT16_ARRAY: Class = Class::new("Int16Array");
pub static UINT16_ARRAY: Class = Class::new("Uint16Array");
pub static INT32_ARRAY: Class = Class::new("Int32Array");
pub static UINT32_ARRAY: Class = Class::new("Uint32Array");
pub static FLOAT32_ARRAY: Class = Class::new("Float32Array");
pub static FLOAT64_ARRAY: Class = Class::new("Float64Array");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    #[must_use]
    pub fn class(self) -> TypeToken {
        TypeToken::of(match self {
            TypedArrayKind::Int8 => &INT8_ARRAY,
            TypedArrayKind::Uint8 => &UINT8_ARRAY,
            TypedArrayKind::Uint8Clamped => &UINT8_CLAMPED_ARRAY,
            TypedArrayKind::Int16 => &INT16_ARRAY,
            TypedArrayKind::Uint16 => &UINT16_ARRAY,
            TypedArrayKind::Int32 => &INT32_ARRAY,
            TypedArrayKind::Uint32 => &UINT32_ARRAY,
            TypedArrayKind::Float32 => &FLOAT32_ARRAY,
            TypedArrayKind::Float64 => &FLOAT64_ARRAY,
        })
    }
}

/// The elements of a typed array.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Uint8Clamped(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    /// Converts `numbers` into an array of `kind`.
    ///
    /// ```rust
    /// use serde_construct::library::{TypedArray, TypedArrayKind};
    ///
    /// let bytes = TypedArray::from_numbers(TypedArrayKind::Uint8, &[256.0, -1.0, 3.7]);
    /// assert_eq!(bytes, TypedArray::Uint8(vec![0, 255, 3]));
    ///
    /// let clamped = TypedArray::from_numbers(TypedArrayKind::Uint8Clamped, &[300.0, 2.5, 3.5]);
    /// assert_eq!(clamped, TypedArray::Uint8Clamped(vec![255, 2, 4]));
    /// ```
    #[must_use]
    pub fn from_numbers(kind: TypedArrayKind, numbers: &[f64]) -> Self {
        let iter = numbers.iter().copied();
        match kind {
            TypedArrayKind::Int8 => TypedArray::Int8(iter.map(|n| wrap(n, 8) as i8).collect()),
            TypedArrayKind::Uint8 => TypedArray::Uint8(iter.map(|n| wrap(n, 8) as u8).collect()),
            TypedArrayKind::Uint8Clamped => TypedArray::Uint8Clamped(iter.map(clamp).collect()),
            TypedArrayKind::Int16 => TypedArray::Int16(iter.map(|n| wrap(n, 16) as i16).collect()),
            TypedArrayKind::Uint16 => {
                TypedArray::Uint16(iter.map(|n| wrap(n, 16) as u16).collect())
            }
            TypedArrayKind::Int32 => TypedArray::Int32(iter.map(|n| wrap(n, 32) as i32).collect()),
            TypedArrayKind::Uint32 => TypedArray::Uint32(iter.map(|n| wrap(n, 32) as u32).collect()),
            TypedArrayKind::Float32 => TypedArray::Float32(iter.map(|n| n as f32).collect()),
            TypedArrayKind::Float64 => TypedArray::Float64(iter.collect()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TypedArrayKind {
        match self {
            TypedArray::Int8(_) => TypedArrayKind::Int8,
            TypedArray::Uint8(_) => TypedArrayKind::Uint8,
            TypedArray::Uint8Clamped(_) => TypedArrayKind::Uint8Clamped,
            TypedArray::Int16(_) => TypedArrayKind::Int16,
            TypedArray::Uint16(_) => TypedArrayKind::Uint16,
            TypedArray::Int32(_) => TypedArrayKind::Int32,
            TypedArray::Uint32(_) => TypedArrayKind::Uint32,
            TypedArray::Float32(_) => TypedArrayKind::Float32,
            TypedArray::Float64(_) => TypedArrayKind::Float64,
        }
    }

    /// The elements widened to `f64`.
    #[must_use]
    pub fn to_numbers(&self) -> Vec<f64> {
        match self {
            TypedArray::Int8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => {
                v.iter().map(|&x| f64::from(x)).collect()
            }
            TypedArray::Int16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Int32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Float32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Float64(v) => v.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Int8(v) => v.len(),
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Uint16(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Uint32(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Truncates and reduces modulo `2^bits`; the caller reinterprets the low bits.
fn wrap(n: f64, bits: u32) -> i64 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(2f64.powi(bits as i32)) as i64
}

fn clamp(n: f64) -> u8 {
    if n.is_nan() {
        return 0;
    }
    let clamped = n.clamp(0.0, 255.0);
    let rounded = clamped.round();
    // Ties go to the even neighbour.
    let rounded = if clamped.fract() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - 1.0
    } else {
        rounded
    };
    rounded as u8
}

pub(super) fn spec(kind: TypedArrayKind) -> ConstructionSpec {
    let class = kind.class();
    ConstructionSpec::new(class)
        .with_serializer(move |value| match slot_of(value, class)? {
            Slot::TypedArray(array) => Ok(array.to_numbers().into_iter().map(Value::Number).collect()),
            _ => Ok(Vec::new()),
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                let numbers: Vec<f64> = args.iter().map(Value::to_number).collect();
                Ok(Slot::TypedArray(TypedArray::from_numbers(kind, &numbers)))
            })
        })
}

impl Value {
    /// A typed array object.
    #[must_use]
    pub fn typed_array(array: TypedArray) -> Value {
        Value::Object(Object::with_slot(array.kind().class(), Slot::TypedArray(array)))
    }
}
