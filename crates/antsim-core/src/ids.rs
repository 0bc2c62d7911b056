/// Colony identifier: a small index into the simulation's colony list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColonyId(pub u8);

impl ColonyId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Generational agent handle into a colony's [`SlotStore`](crate::SlotStore).
///
/// `index` is only meaningful until the slot is freed; `generation` is bumped
/// on every removal so stale handles fail to resolve instead of aliasing a
/// newer agent that reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId {
    pub index: u32,
    pub generation: u32,
}

impl AgentId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> u64 {
        ((self.index as u64) << 32) | (self.generation as u64)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AgentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.to_raw())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AgentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <u64 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

/// Weak, non-owning reference to an agent of any colony.
///
/// Must be resolved through a liveness check on every use; the referenced
/// agent may be retired by the same tick's compaction pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntRef {
    pub colony: ColonyId,
    pub id: AgentId,
}

impl AntRef {
    #[inline]
    pub const fn new(colony: ColonyId, id: AgentId) -> Self {
        Self { colony, id }
    }
}
