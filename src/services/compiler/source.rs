use super::SourceUnit;
use crate::services::identity::PackIdentity;

pub const GENERATED_PACKAGE: &str = "pokepatcher.generated";

const CLASS_PREFIX: &str = "Datapack_";

/// `pokepatcher.generated.Datapack_<identifier>`
pub fn entrypoint_class_name(identity: &PackIdentity) -> String {
    format!("{GENERATED_PACKAGE}.{CLASS_PREFIX}{identity}")
}

/// Java source of the generated `ModInitializer`.
///
/// Identifiers only hold `[a-z0-9_]`, so they are valid both after the class
/// prefix and inside a string literal.
pub fn entrypoint_source(identity: &PackIdentity) -> SourceUnit {
    let simple_name = format!("{CLASS_PREFIX}{identity}");
    let source = format!(
        r#"package {GENERATED_PACKAGE};

import net.fabricmc.api.ModInitializer;
import org.slf4j.Logger;
import org.slf4j.LoggerFactory;

public class {simple_name} implements ModInitializer {{
    private static final Logger LOGGER = LoggerFactory.getLogger("{identity}");

    @Override
    public void onInitialize() {{
        LOGGER.info("Loaded patched datapack {identity}");
    }}
}}
"#
    );

    SourceUnit {
        class_name: entrypoint_class_name(identity),
        source,
    }
}
