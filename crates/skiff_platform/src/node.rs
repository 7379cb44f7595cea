//! Platform chain resolution
//!
//! Resolution builds a transient parent/child chain of [`PlatformNode`]s in
//! an arena and flattens it into an ordered list of platform names, from the
//! outermost superset down to the most specific match.
//!
//! The steps, in order:
//!
//! 1. every registry entry is tried as a starting point; a matching entry
//!    climbs to its root through the first declared subset parent that
//!    itself resolves (first candidate wins, no exhaustive search)
//! 2. engine roots (e.g. a webview bridge) are kept aside; among the others
//!    the deepest chain wins, earlier candidates winning ties
//! 3. nothing matched: a lone node for the default platform is used
//! 4. the engine, if any, becomes the outermost ancestor
//! 5. supersets are inserted above the nodes declaring them, chaining
//!    upward, skipping names already in the chain
//! 6. the chain is re-rooted at its new outermost node

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::registry::PlatformRegistry;

/// Longest parent chain resolution will follow before assuming the
/// registry declares a cycle
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Query parameter that force-matches the listed platforms
pub const PLATFORM_OVERRIDE_PARAM: &str = "ionicplatform";

/// Index of a node in the resolution arena
pub type NodeId = usize;

/// One registry entry during a resolution pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformNode {
    /// Registry name
    pub name: String,
    /// Broader node above this one
    pub parent: Option<NodeId>,
    /// More specific node below this one
    pub child: Option<NodeId>,
    /// Distance to the chain's leaf; only meaningful on a chain root
    pub depth: usize,
    /// Copied from the registry entry
    pub is_engine: bool,
}

/// Arena owning every node created during one resolution pass
pub struct NodeArena<'a> {
    registry: &'a PlatformRegistry,
    plt: &'a Platform,
    nodes: Vec<PlatformNode>,
}

impl<'a> NodeArena<'a> {
    /// Create an empty arena matching against `plt`
    pub fn new(registry: &'a PlatformRegistry, plt: &'a Platform) -> Self {
        Self {
            registry,
            plt,
            nodes: Vec::new(),
        }
    }

    /// Access a node
    pub fn node(&self, id: NodeId) -> &PlatformNode {
        &self.nodes[id]
    }

    fn create(&mut self, name: &str) -> NodeId {
        let is_engine = self.registry.get(name).is_some_and(|c| c.is_engine);
        self.nodes.push(PlatformNode {
            name: name.to_string(),
            parent: None,
            child: None,
            depth: 0,
            is_engine,
        });
        self.nodes.len() - 1
    }

    /// Whether the node's platform matches the environment
    ///
    /// The `ionicplatform` query override force-matches any platform it
    /// lists; everything else defers to the registry predicate.
    pub fn is_match(&self, id: NodeId) -> bool {
        let name = &self.nodes[id].name;
        if let Some(forced) = self.plt.platform_override() {
            if self.plt.test_query(forced, name) {
                return true;
            }
        }
        self.registry
            .get(name)
            .is_some_and(|config| config.is_match(self.plt))
    }

    /// Climb from a matching node to the root of its chain
    ///
    /// Returns `None` when the node does not match, or when it has subset
    /// parents and none of them resolves.
    pub fn get_root(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        self.get_root_at(id, 0)
    }

    fn get_root_at(&mut self, id: NodeId, level: usize) -> Result<Option<NodeId>> {
        if level > MAX_CHAIN_DEPTH {
            return Err(self.cycle_error(id));
        }
        if !self.is_match(id) {
            return Ok(None);
        }

        let name = self.nodes[id].name.clone();
        let parents: Vec<String> = self
            .registry
            .subset_parents(&name)
            .into_iter()
            .map(str::to_string)
            .collect();

        if parents.is_empty() {
            return Ok(Some(id));
        }

        for parent_name in &parents {
            let parent = self.create(parent_name);
            self.nodes[parent].child = Some(id);

            if let Some(root) = self.get_root_at(parent, level + 1)? {
                self.nodes[id].parent = Some(parent);
                return Ok(Some(root));
            }
        }

        Ok(None)
    }

    /// Resolve `name` as a starting platform and compute its chain depth
    pub fn match_platform(&mut self, name: &str) -> Result<Option<NodeId>> {
        let start = self.create(name);
        let Some(root) = self.get_root(start)? else {
            return Ok(None);
        };

        let mut depth = 0;
        let mut next = self.nodes[root].child;
        while let Some(child) = next {
            depth += 1;
            if depth > MAX_CHAIN_DEPTH {
                return Err(self.cycle_error(root));
            }
            next = self.nodes[child].child;
        }
        self.nodes[root].depth = depth;

        Ok(Some(root))
    }

    /// Insert the node's superset above it, then that superset's superset,
    /// and so on; names already in the chain are not inserted again
    pub fn insert_superset(&mut self, id: NodeId) -> Result<()> {
        let mut current = id;
        for _ in 0..=MAX_CHAIN_DEPTH {
            let Some(superset) = self
                .registry
                .get(&self.nodes[current].name)
                .and_then(|c| c.superset.clone())
            else {
                return Ok(());
            };

            if self.chain_contains(current, &superset)? {
                return Ok(());
            }

            let inserted = self.create(&superset);
            let parent = self.nodes[current].parent;
            self.nodes[inserted].parent = parent;
            self.nodes[inserted].child = Some(current);
            if let Some(parent) = parent {
                self.nodes[parent].child = Some(inserted);
            }
            self.nodes[current].parent = Some(inserted);

            tracing::debug!(
                "inserted superset '{}' above '{}'",
                superset,
                self.nodes[current].name
            );
            current = inserted;
        }

        Err(self.cycle_error(id))
    }

    /// Outermost ancestor of `id`
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut root = id;
        let mut steps = 0;
        while let Some(parent) = self.nodes[root].parent {
            steps += 1;
            if steps > MAX_CHAIN_DEPTH * 2 {
                return Err(self.cycle_error(id));
            }
            root = parent;
        }
        Ok(root)
    }

    /// Nodes from `root` to the leaf
    pub fn chain(&self, root: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![root];
        let mut next = self.nodes[root].child;
        while let Some(child) = next {
            if chain.len() > MAX_CHAIN_DEPTH * 2 {
                return Err(self.cycle_error(root));
            }
            chain.push(child);
            next = self.nodes[child].child;
        }
        Ok(chain)
    }

    fn chain_contains(&self, id: NodeId, name: &str) -> Result<bool> {
        let root = self.root_of(id)?;
        Ok(self
            .chain(root)?
            .into_iter()
            .any(|n| self.nodes[n].name == name))
    }

    fn cycle_error(&self, id: NodeId) -> PlatformError {
        tracing::warn!(
            "platform registry cycle while resolving '{}'",
            self.nodes[id].name
        );
        PlatformError::RegistryCycle {
            name: self.nodes[id].name.clone(),
            limit: MAX_CHAIN_DEPTH,
        }
    }
}

/// Resolve the platform chain for `plt`, root first
///
/// Falls back to `default` when no registry entry matches; only a cyclic
/// registry produces an error.
pub fn resolve_chain(
    registry: &PlatformRegistry,
    plt: &Platform,
    default: &str,
) -> Result<Vec<String>> {
    let mut arena = NodeArena::new(registry, plt);

    let mut root: Option<NodeId> = None;
    let mut engine: Option<NodeId> = None;

    for name in registry.names() {
        let Some(candidate) = arena.match_platform(name)? else {
            continue;
        };
        let node = arena.node(candidate);
        tracing::debug!(
            "platform '{}' matched with root '{}' (depth {})",
            name,
            node.name,
            node.depth
        );

        if node.is_engine {
            engine = Some(candidate);
        } else if root.map_or(true, |r| node.depth > arena.node(r).depth) {
            root = Some(candidate);
        }
    }

    let mut root = match root {
        Some(root) => root,
        None => {
            tracing::debug!("no platform matched, using default '{}'", default);
            arena.create(default)
        }
    };

    if let Some(engine) = engine {
        arena.nodes[engine].child = Some(root);
        arena.nodes[root].parent = Some(engine);
        root = engine;
    }

    for id in arena.chain(root)? {
        arena.insert_superset(id)?;
    }

    let root = arena.root_of(root)?;
    let names = arena
        .chain(root)?
        .into_iter()
        .map(|id| arena.node(id).name.clone())
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PlatformConfig;
    use crate::StaticEnvironment;

    fn platform(registry: &PlatformRegistry, ua: &str, url: &str) -> Platform {
        let env = StaticEnvironment::new(ua).with_url(url);
        let mut plt = Platform::new(Box::new(env));
        plt.set_platform_configs(registry.clone());
        plt.set_user_agent(ua);
        plt.set_query_params(url);
        plt
    }

    fn ua_match(token: &'static str) -> impl Fn(&Platform) -> bool + Send + Sync {
        move |plt| plt.test_user_agent(token)
    }

    #[test]
    fn test_get_root_climbs_first_resolving_parent() {
        let registry = PlatformRegistry::new()
            .with("a", PlatformConfig::new().subsets(["leaf"]).matches(|_| false))
            .with("b", PlatformConfig::new().subsets(["leaf"]).matches(|_| true))
            .with("c", PlatformConfig::new().subsets(["leaf"]).matches(|_| true))
            .with("leaf", PlatformConfig::new().matches(|_| true));
        let plt = platform(&registry, "", "");
        let mut arena = NodeArena::new(&registry, &plt);

        let root = arena.match_platform("leaf").unwrap().unwrap();
        assert_eq!(arena.node(root).name, "b");
        assert_eq!(arena.node(root).depth, 1);
    }

    #[test]
    fn test_unresolvable_parents_reject_node() {
        let registry = PlatformRegistry::new()
            .with("ios", PlatformConfig::new().subsets(["iphone"]).matches(|_| false))
            .with("iphone", PlatformConfig::new().matches(|_| true));
        let plt = platform(&registry, "", "");
        let mut arena = NodeArena::new(&registry, &plt);

        assert_eq!(arena.match_platform("iphone").unwrap(), None);
    }

    #[test]
    fn test_node_without_predicate_never_matches() {
        let registry = PlatformRegistry::new().with("mobile", PlatformConfig::new());
        let plt = platform(&registry, "", "");
        let mut arena = NodeArena::new(&registry, &plt);

        assert_eq!(arena.match_platform("mobile").unwrap(), None);
    }

    #[test]
    fn test_query_override_forces_match() {
        let registry = PlatformRegistry::new()
            .with("android", PlatformConfig::new().matches(ua_match("Android")));
        let plt = platform(&registry, "iPhone", "/?ionicplatform=android");
        let mut arena = NodeArena::new(&registry, &plt);

        assert!(arena.match_platform("android").unwrap().is_some());
    }

    #[test]
    fn test_deepest_chain_wins() {
        let registry = PlatformRegistry::new()
            .with("shallow", PlatformConfig::new().subsets(["s1"]).matches(|_| true))
            .with("s1", PlatformConfig::new().matches(|_| true))
            .with("deep", PlatformConfig::new().subsets(["d1"]).matches(|_| true))
            .with("d1", PlatformConfig::new().subsets(["d2"]).matches(|_| true))
            .with("d2", PlatformConfig::new().matches(|_| true));
        let plt = platform(&registry, "", "");

        let chain = resolve_chain(&registry, &plt, "core").unwrap();
        assert_eq!(chain, vec!["deep", "d1", "d2"]);
    }

    #[test]
    fn test_engine_becomes_outermost() {
        let registry = PlatformRegistry::new()
            .with("cordova", PlatformConfig::new().engine().matches(|_| true))
            .with("android", PlatformConfig::new().superset("mobile").matches(|_| true))
            .with("mobile", PlatformConfig::new());
        let plt = platform(&registry, "", "");

        let chain = resolve_chain(&registry, &plt, "core").unwrap();
        assert_eq!(chain, vec!["cordova", "mobile", "android"]);
    }

    #[test]
    fn test_superset_chains_upward() {
        let registry = PlatformRegistry::new()
            .with("mobile", PlatformConfig::new())
            .with("ios", PlatformConfig::new().superset("mobile"))
            .with("iphone", PlatformConfig::new().superset("ios").matches(|_| true));
        let plt = platform(&registry, "", "");

        let chain = resolve_chain(&registry, &plt, "core").unwrap();
        assert_eq!(chain, vec!["mobile", "ios", "iphone"]);
    }

    #[test]
    fn test_superset_already_present_is_not_duplicated() {
        let registry = PlatformRegistry::new()
            .with("mobile", PlatformConfig::new())
            .with(
                "ios",
                PlatformConfig::new()
                    .superset("mobile")
                    .subsets(["iphone"])
                    .matches(|_| true),
            )
            .with("iphone", PlatformConfig::new().superset("ios").matches(|_| true));
        let plt = platform(&registry, "", "");

        let chain = resolve_chain(&registry, &plt, "core").unwrap();
        assert_eq!(chain, vec!["mobile", "ios", "iphone"]);
    }

    #[test]
    fn test_fallback_to_default() {
        let registry = PlatformRegistry::new().with("ios", PlatformConfig::new().matches(|_| false));
        let plt = platform(&registry, "", "");

        assert_eq!(resolve_chain(&registry, &plt, "core").unwrap(), vec!["core"]);
    }

    #[test]
    fn test_subset_cycle_is_reported() {
        let registry = PlatformRegistry::new()
            .with("a", PlatformConfig::new().subsets(["b"]).matches(|_| true))
            .with("b", PlatformConfig::new().subsets(["a"]).matches(|_| true));
        let plt = platform(&registry, "", "");

        let err = resolve_chain(&registry, &plt, "core").unwrap_err();
        assert!(matches!(err, PlatformError::RegistryCycle { .. }));
    }

    #[test]
    fn test_superset_cycle_terminates() {
        let registry = PlatformRegistry::new()
            .with("a", PlatformConfig::new().superset("b").matches(|_| true))
            .with("b", PlatformConfig::new().superset("a"));
        let plt = platform(&registry, "", "");

        assert_eq!(resolve_chain(&registry, &plt, "core").unwrap(), vec!["b", "a"]);
    }
}
