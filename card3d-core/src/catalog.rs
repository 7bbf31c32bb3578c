/// Selectable card face images
use rand::Rng;

use crate::error::{CardError, Result};

/// Ordered, non-empty list of face identifiers plus the one currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCatalog {
    faces: Vec<String>,
    current: usize,
}

impl FaceCatalog {
    /// Build a catalog showing a uniformly random face.
    pub fn new<R: Rng + ?Sized>(faces: Vec<String>, rng: &mut R) -> Result<Self> {
        if faces.is_empty() {
            return Err(CardError::EmptyCatalog { len: 0 });
        }
        let current = rng.random_range(0..faces.len());
        Ok(Self { faces, current })
    }

    /// Build a catalog showing `current`.
    pub fn with_current(faces: Vec<String>, current: &str) -> Result<Self> {
        if faces.is_empty() {
            return Err(CardError::EmptyCatalog { len: 0 });
        }
        let current = faces
            .iter()
            .position(|f| f == current)
            .ok_or_else(|| CardError::UnknownFace(current.to_string()))?;
        Ok(Self { faces, current })
    }

    pub fn current(&self) -> &str {
        &self.faces[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn faces(&self) -> &[String] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Whether a distinct face can be chosen.
    pub fn can_change(&self) -> bool {
        self.faces.len() >= 2
    }

    pub fn select(&mut self, face: &str) -> Result<()> {
        self.current = self
            .faces
            .iter()
            .position(|f| f == face)
            .ok_or_else(|| CardError::UnknownFace(face.to_string()))?;
        Ok(())
    }

    /// Move to a face chosen uniformly from every entry except the current
    /// one, returning the new identifier.
    pub fn pick_different<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str> {
        if !self.can_change() {
            return Err(CardError::EmptyCatalog {
                len: self.faces.len(),
            });
        }
        let mut next = rng.random_range(0..self.faces.len() - 1);
        if next >= self.current {
            next += 1;
        }
        self.current = next;
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn faces(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            FaceCatalog::new(Vec::new(), &mut rng),
            Err(CardError::EmptyCatalog { len: 0 })
        );
    }

    #[test]
    fn test_pick_different_never_repeats() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut catalog = FaceCatalog::with_current(faces(&["A", "B", "C"]), "A").unwrap();
        for _ in 0..200 {
            let before = catalog.current().to_string();
            let after = catalog.pick_different(&mut rng).unwrap().to_string();
            assert_ne!(before, after);
        }
    }

    #[test]
    fn test_pick_different_reaches_every_other_face() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let mut catalog = FaceCatalog::with_current(faces(&["A", "B", "C"]), "A").unwrap();
            catalog.pick_different(&mut rng).unwrap();
            seen[catalog.current_index()] = true;
        }
        assert_eq!(seen, [false, true, true]);
    }

    #[test]
    fn test_single_face_cannot_change() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut catalog = FaceCatalog::new(faces(&["only"]), &mut rng).unwrap();
        assert_eq!(
            catalog.pick_different(&mut rng),
            Err(CardError::EmptyCatalog { len: 1 })
        );
        assert_eq!(catalog.current(), "only");
    }

    #[test]
    fn test_select_unknown_face() {
        let mut catalog = FaceCatalog::with_current(faces(&["A", "B"]), "B").unwrap();
        assert!(catalog.select("Z").is_err());
        assert_eq!(catalog.current(), "B");
        catalog.select("A").unwrap();
        assert_eq!(catalog.current_index(), 0);
    }
}
