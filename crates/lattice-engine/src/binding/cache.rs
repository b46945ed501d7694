use crate::backend::GpuBackend;
use crate::layout::VertexBufferLayout;
use crate::resources::{Program, ProgramId};

use super::{resolve, BindingError};

/// Programs a single submesh may be bound to before the cache refuses more.
///
/// The number of programs that draw one mesh is bounded by content, so hitting
/// this means something is loading programs in a loop.
pub const DEFAULT_BINDING_LIMIT: usize = 16;

/// A binding object together with the program it was built for.
#[derive(Debug)]
pub struct ResolvedBinding<H> {
    pub program: ProgramId,
    pub binding: H,
}

/// Append-only map from program id to binding object, owned by one submesh.
///
/// At most one entry exists per program id. Entries are never replaced or
/// evicted; they are released together with the submesh.
#[derive(Debug)]
pub struct BindingCache<H> {
    entries: Vec<ResolvedBinding<H>>,
    limit: usize,
}

impl<H> Default for BindingCache<H> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_BINDING_LIMIT)
    }
}

impl<H> BindingCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Returns the cached binding for `program`, if one was created.
    pub fn get(&self, program: ProgramId) -> Option<&H> {
        self.entries
            .iter()
            .find(|e| e.program == program)
            .map(|e| &e.binding)
    }

    /// Returns the binding for `program`, creating it on first request.
    ///
    /// Hit: no backend calls. Miss: the program's inputs are resolved against
    /// `vertex` and exactly one binding object is created. Any failure leaves
    /// the cache untouched so the next request retries.
    pub fn get_or_create<B>(
        &mut self,
        backend: &B,
        program: &Program<B>,
        vertex: &VertexBufferLayout,
        vertex_byte_offset: u64,
    ) -> Result<&H, BindingError>
    where
        B: GpuBackend<Binding = H>,
    {
        let id = program.id();

        if let Some(index) = self.entries.iter().position(|e| e.program == id) {
            return Ok(&self.entries[index].binding);
        }

        // Resolve first: a missing attribute is reported even when the cache is full.
        let plan = resolve(program.input_layout(), vertex, vertex_byte_offset)?;

        if self.entries.len() >= self.limit {
            return Err(BindingError::CacheFull { limit: self.limit });
        }

        let binding = backend.create_binding(program.raw(), &plan)?;

        log::debug!(
            "binding cache miss: created binding for {id} ('{}'), {} cached",
            program.name(),
            self.entries.len() + 1
        );

        let index = self.entries.len();
        self.entries.push(ResolvedBinding {
            program: id,
            binding,
        });
        Ok(&self.entries[index].binding)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedBinding<H>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{RecordedBinding, RecordingBackend};
    use crate::layout::ShaderInputLayout;
    use crate::resources::ProgramStore;

    struct Fixture {
        backend: RecordingBackend,
        programs: ProgramStore<RecordingBackend>,
        vertex: VertexBufferLayout,
        cache: BindingCache<RecordedBinding>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                backend: RecordingBackend::new(),
                programs: ProgramStore::new(),
                vertex: VertexBufferLayout::packed(&[(0, 3), (1, 2)]).unwrap(),
                cache: BindingCache::new(),
            }
        }

        fn load(&mut self, pairs: &[(u32, u8)]) -> ProgramId {
            let layout = ShaderInputLayout::from_pairs(pairs).unwrap();
            self.programs.load(&self.backend, "test", "src", layout).unwrap()
        }

        fn request(&mut self, id: ProgramId) -> Result<u32, BindingError> {
            let program = self.programs.get(id).unwrap();
            self.cache
                .get_or_create(&self.backend, program, &self.vertex, 0)
                .map(|b| b.id)
        }
    }

    #[test]
    fn repeated_request_returns_same_handle() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);

        let first = f.request(a).unwrap();
        let second = f.request(a).unwrap();

        assert_eq!(first, second);
        assert_eq!(f.backend.bindings_created.get(), 1);
        assert_eq!(f.cache.len(), 1);
    }

    #[test]
    fn distinct_programs_get_distinct_bindings() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);
        let b = f.load(&[(0, 3)]);

        let ha = f.request(a).unwrap();
        let hb = f.request(b).unwrap();

        assert_ne!(ha, hb);
        assert_eq!(f.cache.len(), 2);
        assert_eq!(f.cache.get(a).map(|h| h.program), f.programs.get(a).map(|p| *p.raw()));
    }

    #[test]
    fn identical_layouts_are_still_cached_per_program() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);
        let b = f.load(&[(0, 3), (1, 2)]);

        assert_ne!(f.request(a).unwrap(), f.request(b).unwrap());
        assert_eq!(f.backend.bindings_created.get(), 2);
    }

    #[test]
    fn a_then_b_then_a_creates_two_objects() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);
        let b = f.load(&[(1, 2)]);

        let first = f.request(a).unwrap();
        f.request(b).unwrap();
        let third = f.request(a).unwrap();

        assert_eq!(first, third);
        assert_eq!(f.backend.bindings_created.get(), 2);
    }

    #[test]
    fn missing_attribute_inserts_nothing() {
        let mut f = Fixture::new();
        let bad = f.load(&[(0, 3), (5, 2)]);

        assert_eq!(
            f.request(bad),
            Err(BindingError::MissingAttribute { location: 5 })
        );
        assert!(f.cache.is_empty());
        assert!(f.cache.get(bad).is_none());
        assert_eq!(f.backend.bindings_created.get(), 0);
    }

    #[test]
    fn failed_request_is_retried_not_remembered() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);

        f.backend.failing_bindings.set(1);
        assert!(matches!(f.request(a), Err(BindingError::Resource(_))));
        assert!(f.cache.is_empty());

        assert!(f.request(a).is_ok());
        assert_eq!(f.cache.len(), 1);
        assert_eq!(f.backend.bindings_created.get(), 1);
    }

    #[test]
    fn hit_makes_no_backend_calls() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3)]);

        f.request(a).unwrap();
        f.backend.failing_bindings.set(1);

        // A backend call would fail now; a hit must not make one.
        assert!(f.request(a).is_ok());
        assert_eq!(f.backend.failing_bindings.get(), 1);
    }

    #[test]
    fn limit_bounds_growth() {
        let mut f = Fixture::new();
        f.cache = BindingCache::with_limit(2);

        let ids: Vec<_> = (0..3).map(|_| f.load(&[(0, 3)])).collect();
        f.request(ids[0]).unwrap();
        f.request(ids[1]).unwrap();

        assert_eq!(f.request(ids[2]), Err(BindingError::CacheFull { limit: 2 }));
        // Existing entries are still served.
        assert!(f.request(ids[0]).is_ok());
        assert_eq!(f.cache.len(), 2);
    }

    #[test]
    fn full_cache_still_reports_missing_attribute() {
        let mut f = Fixture::new();
        f.cache = BindingCache::with_limit(1);

        let a = f.load(&[(0, 3)]);
        let bad = f.load(&[(0, 3), (5, 2)]);
        f.request(a).unwrap();

        assert_eq!(
            f.request(bad),
            Err(BindingError::MissingAttribute { location: 5 })
        );
        assert_eq!(f.cache.len(), 1);
    }

    #[test]
    fn plan_passed_to_backend_uses_vertex_offset() {
        let mut f = Fixture::new();
        let a = f.load(&[(0, 3), (1, 2)]);
        let program = f.programs.get(a).unwrap();

        f.cache
            .get_or_create(&f.backend, program, &f.vertex, 80)
            .unwrap();

        let plans = f.backend.plans.borrow();
        let offsets: Vec<u64> = plans[0].directives().iter().map(|d| d.offset).collect();
        assert_eq!(offsets, vec![80, 92]);
        assert_eq!(plans[0].base_offset(), 80);
    }
}
