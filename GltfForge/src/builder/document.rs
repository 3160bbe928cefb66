//! Entity registration and lookup.

use crate::json::{Extension, Index, JsonEntity, Node, Scene};

use super::GltfBuilder;

impl GltfBuilder {
    // ========================================================================
    // Generic Access
    // ========================================================================

    /// Append `entity` and return its index. Indices count up from zero per
    /// category and are never reused.
    pub fn add<T: JsonEntity>(&mut self, entity: T) -> Index<T> {
        let entities = T::collection_mut(&mut self.root);
        let index = Index::from_position(entities.len());
        entities.push(entity);
        index
    }

    /// Look up a previously added entity.
    ///
    /// # Panics
    /// Panics if `index` is unset or was not returned by [`GltfBuilder::add`].
    #[must_use]
    pub fn get<T: JsonEntity>(&self, index: Index<T>) -> &T {
        let position = expect_position(index);
        T::collection(&self.root)
            .get(position)
            .unwrap_or_else(|| panic!("{} index {position} is out of range", T::KIND))
    }

    /// Mutable variant of [`GltfBuilder::get`].
    ///
    /// # Panics
    /// Panics if `index` is unset or out of range.
    pub fn get_mut<T: JsonEntity>(&mut self, index: Index<T>) -> &mut T {
        let position = expect_position(index);
        T::collection_mut(&mut self.root)
            .get_mut(position)
            .unwrap_or_else(|| panic!("{} index {position} is out of range", T::KIND))
    }

    /// Non-panicking lookup.
    #[must_use]
    pub fn try_get<T: JsonEntity>(&self, index: Index<T>) -> Option<&T> {
        T::collection(&self.root).get(index.position()?)
    }

    /// Number of entities added in `T`'s category.
    #[must_use]
    pub fn count<T: JsonEntity>(&self) -> usize {
        T::collection(&self.root).len()
    }

    // ========================================================================
    // Node Hierarchy
    // ========================================================================

    /// Add `node` and, when `parent` is set, append it to the parent's children.
    pub fn add_child_node(&mut self, parent: Index<Node>, node: Node) -> Index<Node> {
        let child = self.add(node);
        if parent.is_set() {
            self.get_mut(parent).children.push(child);
        }
        child
    }

    /// Like [`GltfBuilder::add_child_node`], and also records the new node as
    /// the parent's component node.
    pub fn add_child_component_node(&mut self, parent: Index<Node>, node: Node) -> Index<Node> {
        let child = self.add_child_node(parent, node);
        if parent.is_set() {
            self.get_mut(parent).component_node = child;
        }
        child
    }

    /// The component node of `node` if it has one, otherwise `node` itself.
    /// Unset stays unset.
    #[must_use]
    pub fn get_component_node_index(&self, node: Index<Node>) -> Index<Node> {
        if node.is_unset() {
            return node;
        }
        self.get(node).component_node.or(node)
    }

    // ========================================================================
    // Document Level
    // ========================================================================

    /// Mark `extension` used, and required when `required` is set.
    pub fn add_extension(&mut self, extension: Extension, required: bool) {
        self.root.extensions.add(extension, required);
    }

    /// Scene shown when the asset is loaded.
    pub fn set_default_scene(&mut self, scene: Index<Scene>) {
        self.root.scene = scene;
    }
}

fn expect_position<T: JsonEntity>(index: Index<T>) -> usize {
    index
        .position()
        .unwrap_or_else(|| panic!("unset {} index passed to the builder", T::KIND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{Camera, Material, Mesh};
    use crate::options::ExportOptions;

    fn builder() -> GltfBuilder {
        GltfBuilder::in_memory(ExportOptions::new())
    }

    #[test]
    fn test_indices_count_up_per_category() {
        let mut builder = builder();
        for n in 0..5_u32 {
            let node = builder.add(Node::named(format!("node{n}")));
            assert_eq!(node, Index::new(n));
        }
        assert_eq!(builder.add(Mesh::default()), Index::new(0));
        assert_eq!(builder.get(Index::<Node>::new(3)).name, "node3");
        assert_eq!(builder.count::<Node>(), 5);
        assert_eq!(builder.count::<Camera>(), 0);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut builder = builder();
        let material = builder.add(Material::default());
        builder.get_mut(material).double_sided = true;
        assert!(builder.get(material).double_sided);
    }

    #[test]
    #[should_panic(expected = "unset Node index")]
    fn test_get_unset_panics() {
        let _ = builder().get(Index::<Node>::UNSET);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        let _ = builder().get(Index::<Node>::new(0));
    }

    #[test]
    fn test_try_get() {
        let mut builder = builder();
        let node = builder.add(Node::default());
        assert!(builder.try_get(node).is_some());
        assert!(builder.try_get(Index::<Node>::new(1)).is_none());
        assert!(builder.try_get(Index::<Node>::UNSET).is_none());
    }

    #[test]
    fn test_child_nodes() {
        let mut builder = builder();
        let root = builder.add_child_node(Index::UNSET, Node::named("root"));
        let a = builder.add_child_node(root, Node::named("a"));
        let b = builder.add_child_node(root, Node::named("b"));

        assert_eq!(builder.get(root).children, vec![a, b]);
        assert!(builder.get(a).children.is_empty());
    }

    #[test]
    fn test_component_node_alias() {
        let mut builder = builder();
        let pivot = builder.add(Node::named("pivot"));
        let plain = builder.add(Node::named("plain"));
        let component = builder.add_child_component_node(pivot, Node::named("component"));

        assert_eq!(builder.get(pivot).children, vec![component]);
        assert_eq!(builder.get_component_node_index(pivot), component);
        assert_eq!(builder.get_component_node_index(plain), plain);
        assert!(builder.get_component_node_index(Index::UNSET).is_unset());
    }

    #[test]
    fn test_add_extension() {
        let mut builder = builder();
        builder.add_extension(Extension::KhrMeshQuantization, true);
        builder.add_extension(Extension::KhrTextureTransform, false);

        let extensions = &builder.root().extensions;
        assert!(extensions.is_required(Extension::KhrMeshQuantization));
        assert!(extensions.is_used(Extension::KhrTextureTransform));
        assert!(!extensions.is_required(Extension::KhrTextureTransform));
    }
}
