//! `serde` support: trees serialize as an ordered sequence.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::compare::Comparator;
use crate::tree::OrdTree;

impl<T: Serialize, C> Serialize for OrdTree<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct TreeVisitor<T, C>(PhantomData<(T, C)>);

impl<'de, T, C> Visitor<'de> for TreeVisitor<T, C>
where
    T: Deserialize<'de> + Clone,
    C: Comparator<T> + Clone + Default,
{
    type Value = OrdTree<T, C>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of tree elements")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut tree = OrdTree::default();
        while let Some(value) = seq.next_element()? {
            tree = tree.insert(value);
        }
        Ok(tree)
    }
}

impl<'de, T, C> Deserialize<'de> for OrdTree<T, C>
where
    T: Deserialize<'de> + Clone,
    C: Comparator<T> + Clone + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(TreeVisitor(PhantomData))
    }
}
