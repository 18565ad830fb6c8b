use ee_utils::hash::HashMap;
use log::{error, warn};

use crate::TypeID;
use crate::core_types::CoreTypeRegistry;
use crate::info::{EnumInfo, PropertyInfo, TypeInfo, Typed};
use crate::path::PropertyPath;
use crate::reflection::ReflectedEnum;
#[cfg(feature = "tools")]
use crate::resource::DataFileInfo;
use crate::resource::{ResourceInfo, ResourceTypeID};

/// The catalog every reflection operation resolves ids against.
///
/// Registration is an explicit phase: a type's parent must be registered
/// before the type, and everything registered must be unregistered before
/// the registry is dropped. Type infos are borrowed `'static` data; enum,
/// resource and data file infos are owned.
///
/// # Examples
///
/// ```
/// use ee_reflect::derive::Reflect;
/// use ee_reflect::registry::TypeRegistry;
/// use ee_reflect::info::Typed;
///
/// #[derive(Reflect, Default)]
/// struct Entity {
///     name: String,
/// }
///
/// #[derive(Reflect, Default)]
/// struct Player {
///     #[reflect(base)]
///     entity: Entity,
///     score: u32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type::<Entity>();
/// registry.register_type::<Player>();
///
/// assert!(registry.is_type_derived_from(Player::reflect_type_id(), Entity::reflect_type_id()));
/// assert_eq!(registry.get_all_derived_types(Entity::reflect_type_id(), false, true, true).len(), 1);
///
/// registry.unregister_type(Player::reflect_type_id());
/// registry.unregister_type(Entity::reflect_type_id());
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    core_types: CoreTypeRegistry,
    types: HashMap<TypeID, &'static TypeInfo>,
    enums: HashMap<TypeID, EnumInfo>,
    resources: HashMap<ResourceTypeID, ResourceInfo>,
    #[cfg(feature = "tools")]
    data_files: HashMap<TypeID, DataFileInfo>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// An empty registry with the core types initialized.
    pub fn new() -> Self {
        let mut core_types = CoreTypeRegistry::new();
        core_types.initialize();

        Self {
            core_types,
            types: HashMap::default(),
            enums: HashMap::default(),
            resources: HashMap::default(),
            #[cfg(feature = "tools")]
            data_files: HashMap::default(),
        }
    }

    #[inline]
    pub fn core_type_registry(&self) -> &CoreTypeRegistry {
        &self.core_types
    }

    #[inline]
    pub fn is_core_type(&self, type_id: TypeID) -> bool {
        self.core_types.is_core_type(type_id)
    }

    // -------------------------------------------------------------------------
    // Types

    /// Register `T`, building its [`TypeInfo`] if needed.
    pub fn register_type<T: Typed>(&mut self) -> &'static TypeInfo {
        let info = T::type_info();
        self.register_type_info(info);
        info
    }

    /// # Panics
    ///
    /// Panics if the id is invalid, names a core type, is already
    /// registered, or if the type's parent is not registered yet.
    pub fn register_type_info(&mut self, info: &'static TypeInfo) {
        let id = info.id();
        assert!(id.is_valid(), "type registered with an invalid type id");
        assert!(!self.is_core_type(id), "{id} is a core type and cannot be registered");
        assert!(!self.types.contains_key(&id), "type {id} registered twice");
        if let Some(parent) = info.parent() {
            assert!(
                self.types.contains_key(&parent.id()),
                "type {id} registered before its parent {}",
                parent.id(),
            );
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.check_property_types(info);

        self.types.insert(id, info);
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    fn check_property_types(&self, info: &TypeInfo) {
        for property in info.properties() {
            let known = self.is_core_type(property.type_id)
                || self.enums.contains_key(&property.type_id)
                || self.types.contains_key(&property.type_id)
                || property.type_id == info.id();
            if !known {
                warn!(
                    "property `{}` of {} has type {}, which is not registered yet",
                    property.id,
                    info.id(),
                    property.type_id,
                );
            }
        }
    }

    /// # Panics
    ///
    /// Panics if the type is not registered or a registered type still
    /// derives from it.
    pub fn unregister_type(&mut self, type_id: TypeID) {
        assert!(self.types.contains_key(&type_id), "type {type_id} is not registered");
        if let Some(child) = self
            .types
            .values()
            .find(|info| info.id() != type_id && info.is_derived_from(type_id))
        {
            panic!("type {type_id} unregistered while {} still derives from it", child.id());
        }
        self.types.remove(&type_id);
    }

    #[inline]
    pub fn get_type_info(&self, type_id: TypeID) -> Option<&'static TypeInfo> {
        self.types.get(&type_id).copied()
    }

    #[inline]
    pub fn is_registered_type(&self, type_id: TypeID) -> bool {
        self.types.contains_key(&type_id)
    }

    /// `true` if `type_id` is `parent` or one of its registered descendants.
    pub fn is_type_derived_from(&self, type_id: TypeID, parent: TypeID) -> bool {
        self.get_type_info(type_id)
            .is_some_and(|info| info.is_derived_from(parent))
    }

    /// Follow `path` from `type_info` to the property it names.
    ///
    /// Every element but the last must name a structure property, or an
    /// array of structures. Failures are logged and return `None`.
    pub fn resolve_property_path(
        &self,
        type_info: &'static TypeInfo,
        path: &PropertyPath,
    ) -> Option<&'static PropertyInfo> {
        let mut current = type_info;
        let last = path.len().checked_sub(1)?;

        for (index, element) in path.iter().enumerate() {
            let Some(property) = current.get_property_info(element.id) else {
                warn!("cannot resolve `{path}`: {} has no property `{}`", current.id(), element.id);
                return None;
            };

            if index == last {
                return Some(property);
            }

            if !property.is_structure() {
                warn!(
                    "cannot resolve `{path}`: `{}` of {} is not a structure",
                    element.id,
                    current.id(),
                );
                return None;
            }

            let Some(next) = self.get_type_info(property.type_id) else {
                error!(
                    "cannot resolve `{path}`: type {} of `{}` is not registered",
                    property.type_id,
                    element.id,
                );
                return None;
            };
            current = next;
        }

        None
    }

    fn sorted(mut types: Vec<&'static TypeInfo>, sort_alphabetically: bool) -> Vec<&'static TypeInfo> {
        if sort_alphabetically {
            #[cfg(feature = "tools")]
            types.sort_by(|a, b| a.friendly_name().cmp(b.friendly_name()));
            #[cfg(not(feature = "tools"))]
            types.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        }
        types
    }

    pub fn get_all_types(&self, include_abstract: bool, sort_alphabetically: bool) -> Vec<&'static TypeInfo> {
        let types = self
            .types
            .values()
            .copied()
            .filter(|info| include_abstract || !info.is_abstract())
            .collect();
        Self::sorted(types, sort_alphabetically)
    }

    pub fn get_all_derived_types(
        &self,
        parent: TypeID,
        include_parent: bool,
        include_abstract: bool,
        sort_alphabetically: bool,
    ) -> Vec<&'static TypeInfo> {
        let types = self
            .types
            .values()
            .copied()
            .filter(|info| info.is_derived_from(parent))
            .filter(|info| include_parent || info.id() != parent)
            .filter(|info| include_abstract || !info.is_abstract())
            .collect();
        Self::sorted(types, sort_alphabetically)
    }

    // -------------------------------------------------------------------------
    // Enums

    pub fn register_enum<E: ReflectedEnum>(&mut self) -> &EnumInfo {
        let id = E::reflect_type_id();
        self.register_enum_info(E::enum_info());
        &self.enums[&id]
    }

    /// # Panics
    ///
    /// Panics if the id names a core type or an enum already registered.
    pub fn register_enum_info(&mut self, info: EnumInfo) {
        let id = info.id();
        assert!(!self.is_core_type(id), "{id} is a core type and cannot be registered");
        assert!(!self.enums.contains_key(&id), "enum {id} registered twice");
        self.enums.insert(id, info);
    }

    /// # Panics
    ///
    /// Panics if the enum is not registered.
    pub fn unregister_enum(&mut self, type_id: TypeID) {
        assert!(
            self.enums.remove(&type_id).is_some(),
            "enum {type_id} is not registered"
        );
    }

    #[inline]
    pub fn get_enum_info(&self, type_id: TypeID) -> Option<&EnumInfo> {
        self.enums.get(&type_id)
    }

    #[inline]
    pub fn get_enum_info_of<E: ReflectedEnum>(&self) -> Option<&EnumInfo> {
        self.get_enum_info(E::reflect_type_id())
    }

    #[inline]
    pub fn is_registered_enum(&self, type_id: TypeID) -> bool {
        self.enums.contains_key(&type_id)
    }

    // -------------------------------------------------------------------------
    // Resources

    /// # Panics
    ///
    /// Panics if the info is invalid or its resource type is already registered.
    pub fn register_resource_info(&mut self, info: ResourceInfo) {
        assert!(info.is_valid(), "invalid resource info {info:?}");
        let resource_type = info.resource_type_id;
        assert!(
            !self.resources.contains_key(&resource_type),
            "resource type {resource_type} registered twice"
        );
        self.resources.insert(resource_type, info);
    }

    /// # Panics
    ///
    /// Panics if the resource type is not registered.
    pub fn unregister_resource_info(&mut self, resource_type: ResourceTypeID) {
        assert!(
            self.resources.remove(&resource_type).is_some(),
            "resource type {resource_type} is not registered"
        );
    }

    #[inline]
    pub fn get_resource_info_for_resource_type(&self, resource_type: ResourceTypeID) -> Option<&ResourceInfo> {
        self.resources.get(&resource_type)
    }

    pub fn get_resource_info_for_type(&self, type_id: TypeID) -> Option<&ResourceInfo> {
        self.resources.values().find(|info| info.type_id == type_id)
    }

    #[inline]
    pub fn is_registered_resource_type(&self, resource_type: ResourceTypeID) -> bool {
        self.resources.contains_key(&resource_type)
    }

    /// `true` if `child` is `parent` or declares it as a parent resource type.
    pub fn is_resource_type_derived_from(&self, child: ResourceTypeID, parent: ResourceTypeID) -> bool {
        self.resources
            .get(&child)
            .is_some_and(|info| info.is_derived_from(parent))
    }

    /// Every registered resource type deriving from `parent`, `parent` included.
    pub fn get_all_derived_resource_types(&self, parent: ResourceTypeID) -> Vec<ResourceTypeID> {
        let mut types: Vec<_> = self
            .resources
            .values()
            .filter(|info| info.is_derived_from(parent))
            .map(|info| info.resource_type_id)
            .collect();
        types.sort();
        types
    }

    // -------------------------------------------------------------------------
    // Data files

    /// # Panics
    ///
    /// Panics if the info is invalid or the type is already registered.
    #[cfg(feature = "tools")]
    pub fn register_data_file_info(&mut self, info: DataFileInfo) {
        assert!(info.is_valid(), "invalid data file info {info:?}");
        let type_id = info.type_id;
        assert!(
            !self.data_files.contains_key(&type_id),
            "data file type {type_id} registered twice"
        );
        self.data_files.insert(type_id, info);
    }

    /// # Panics
    ///
    /// Panics if the type is not registered.
    #[cfg(feature = "tools")]
    pub fn unregister_data_file_info(&mut self, type_id: TypeID) {
        assert!(
            self.data_files.remove(&type_id).is_some(),
            "data file type {type_id} is not registered"
        );
    }

    #[cfg(feature = "tools")]
    #[inline]
    pub fn get_data_file_info(&self, type_id: TypeID) -> Option<&DataFileInfo> {
        self.data_files.get(&type_id)
    }

    #[cfg(feature = "tools")]
    pub fn get_data_file_info_by_extension(&self, extension: ResourceTypeID) -> Option<&DataFileInfo> {
        self.data_files.values().find(|info| info.extension == extension)
    }

    #[cfg(feature = "tools")]
    pub fn get_registered_data_file_types(&self) -> Vec<&DataFileInfo> {
        let mut infos: Vec<_> = self.data_files.values().collect();
        infos.sort_by(|a, b| a.friendly_name.cmp(&b.friendly_name));
        infos
    }

    fn is_empty(&self) -> bool {
        let empty = self.types.is_empty() && self.enums.is_empty() && self.resources.is_empty();
        #[cfg(feature = "tools")]
        let empty = empty && self.data_files.is_empty();
        empty
    }
}

impl Drop for TypeRegistry {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        debug_assert!(
            self.is_empty(),
            "type registry dropped with registrations left: {} types, {} enums, {} resource types",
            self.types.len(),
            self.enums.len(),
            self.resources.len(),
        );
        self.core_types.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Reflect;
    use ee_utils::StringID;

    #[derive(Reflect, Default)]
    struct Leaf {
        v: f32,
    }

    #[derive(Reflect, Default)]
    struct Branch {
        inner: Leaf,
        list: Vec<Leaf>,
        s: u32,
    }

    #[derive(Reflect, Default)]
    #[reflect(abstract)]
    struct Shape {
        sides: u32,
    }

    #[derive(Reflect, Default)]
    struct Square {
        #[reflect(base)]
        shape: Shape,
        size: f32,
    }

    #[derive(Reflect, Default)]
    struct Circle {
        #[reflect(base)]
        shape: Shape,
        radius: f32,
    }

    #[derive(Reflect, Default)]
    struct Arrow {
        length: f32,
    }

    fn path(text: &str) -> PropertyPath {
        PropertyPath::parse(text).unwrap()
    }

    fn ids(types: &[&'static TypeInfo]) -> Vec<TypeID> {
        types.iter().map(|info| info.id()).collect()
    }

    #[test]
    fn resolves_nested_paths() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Leaf>();
        registry.register_type::<Branch>();
        let branch = Branch::type_info();

        let s = registry.resolve_property_path(branch, &path("s")).unwrap();
        assert_eq!(s.id, StringID::new("s"));

        let v = registry.resolve_property_path(branch, &path("inner/v")).unwrap();
        assert_eq!(v.id, StringID::new("v"));
        assert_eq!(v.parent_type_id, Leaf::reflect_type_id());

        let v = registry.resolve_property_path(branch, &path("list/3/v")).unwrap();
        assert_eq!(v.parent_type_id, Leaf::reflect_type_id());

        let list = registry.resolve_property_path(branch, &path("list/3")).unwrap();
        assert!(list.is_dynamic_array());

        registry.unregister_type(Branch::reflect_type_id());
        registry.unregister_type(Leaf::reflect_type_id());
    }

    #[test]
    fn unresolvable_paths_are_none() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Branch>();
        let branch = Branch::type_info();

        assert!(registry.resolve_property_path(branch, &path("s/v")).is_none());
        assert!(registry.resolve_property_path(branch, &path("missing")).is_none());
        assert!(registry.resolve_property_path(branch, &PropertyPath::default()).is_none());
        // `Leaf` is not registered.
        assert!(registry.resolve_property_path(branch, &path("inner/v")).is_none());

        registry.register_type::<Leaf>();
        assert!(registry.resolve_property_path(branch, &path("inner/missing")).is_none());
        assert!(registry.resolve_property_path(branch, &path("inner/v/x")).is_none());

        registry.unregister_type(Branch::reflect_type_id());
        registry.unregister_type(Leaf::reflect_type_id());
    }

    #[test]
    #[should_panic(expected = "registered before its parent")]
    fn child_before_parent_panics() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Square>();
    }

    #[test]
    #[should_panic(expected = "still derives from it")]
    fn unregistering_a_parent_first_panics() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Shape>();
        registry.register_type::<Square>();
        registry.unregister_type(Shape::reflect_type_id());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn double_registration_panics() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Arrow>();
        registry.register_type::<Arrow>();
    }

    #[test]
    fn lists_types_with_filters() {
        let mut registry = TypeRegistry::new();
        registry.register_type::<Shape>();
        registry.register_type::<Square>();
        registry.register_type::<Circle>();
        registry.register_type::<Arrow>();

        let (shape, square, circle, arrow) = (
            Shape::reflect_type_id(),
            Square::reflect_type_id(),
            Circle::reflect_type_id(),
            Arrow::reflect_type_id(),
        );

        assert_eq!(ids(&registry.get_all_types(false, true)), [arrow, circle, square]);
        assert_eq!(ids(&registry.get_all_types(true, true)), [arrow, circle, shape, square]);
        assert_eq!(registry.get_all_types(true, false).len(), 4);

        assert_eq!(ids(&registry.get_all_derived_types(shape, false, true, true)), [circle, square]);
        assert_eq!(ids(&registry.get_all_derived_types(shape, true, true, true)), [circle, shape, square]);
        assert_eq!(ids(&registry.get_all_derived_types(shape, true, false, true)), [circle, square]);
        assert_eq!(ids(&registry.get_all_derived_types(arrow, true, false, true)), [arrow]);

        assert!(registry.is_type_derived_from(square, shape));
        assert!(registry.is_type_derived_from(shape, shape));
        assert!(!registry.is_type_derived_from(shape, square));
        assert!(!registry.is_type_derived_from(arrow, shape));

        for id in [arrow, circle, square, shape] {
            registry.unregister_type(id);
        }
    }

    #[test]
    fn resource_types_follow_declared_parents() {
        let texture = ResourceTypeID::new("tex");
        let cubemap = ResourceTypeID::new("cube");
        let mesh = ResourceTypeID::new("msh");

        let mut registry = TypeRegistry::new();
        registry.register_resource_info(ResourceInfo::new(texture, TypeID::new("render::Texture")));
        registry.register_resource_info(
            ResourceInfo::new(cubemap, TypeID::new("render::Cubemap")).with_parent_type(texture),
        );
        registry.register_resource_info(ResourceInfo::new(mesh, TypeID::new("render::Mesh")));

        assert!(registry.is_resource_type_derived_from(cubemap, texture));
        assert!(registry.is_resource_type_derived_from(texture, texture));
        assert!(!registry.is_resource_type_derived_from(texture, cubemap));
        assert!(!registry.is_resource_type_derived_from(mesh, texture));
        assert!(!registry.is_resource_type_derived_from(ResourceTypeID::new("snd"), texture));

        assert_eq!(registry.get_all_derived_resource_types(texture), [cubemap, texture]);
        assert_eq!(registry.get_all_derived_resource_types(mesh), [mesh]);

        let info = registry.get_resource_info_for_type(TypeID::new("render::Cubemap")).unwrap();
        assert_eq!(info.resource_type_id, cubemap);
        assert!(registry.get_resource_info_for_type(TypeID::new("render::Sound")).is_none());

        for resource_type in [texture, cubemap, mesh] {
            registry.unregister_resource_info(resource_type);
        }
    }

    #[test]
    fn core_types_are_not_registered_types() {
        let registry = TypeRegistry::new();
        assert!(registry.is_core_type(TypeID::new("Float3")));
        assert!(!registry.is_registered_type(TypeID::new("Float3")));
        assert!(registry.get_type_info(TypeID::new("Float3")).is_none());
    }
}
