use core::fmt;
use core::marker::PhantomData;

use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::SpillVec;

impl<T: Serialize, const N: usize> Serialize for SpillVec<T, N> {
    /// Serialized as a plain sequence, whichever region holds the data.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for SpillVec<T, N> {
    /// The result spills exactly when a sequence of more than `N` elements is
    /// read, and then has the capacity collecting those elements would give.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SpillVecVisitor<T, const N: usize> {
            _marker: PhantomData<T>,
        }

        impl<'de, T: Deserialize<'de>, const N: usize> Visitor<'de> for SpillVecVisitor<T, N> {
            type Value = SpillVec<T, N>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut staged = SpillVec::new();
                while let Some(element) = seq.next_element()? {
                    staged.push(element);
                }
                Ok(SpillVec::from_staged(staged))
            }
        }

        deserializer.deserialize_seq(SpillVecVisitor {
            _marker: PhantomData,
        })
    }
}
