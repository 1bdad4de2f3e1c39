//! Bundled suite and model registrations

use super::{Api, ModelInfo, Registry, SuiteInfo, SuiteKind};
use std::path::Path;

const SHITU_MODEL: &str = "PPLCNetV2_base_ShiTu";
const SHITU_CONFIG: &str =
    "ppcls/configs/GeneralRecognitionV2/GeneralRecognitionV2_PPLCNetV2_base.yaml";

const CLS_MODEL: &str = "PPLCNetV2_base";
const CLS_CONFIG: &str = "ppcls/configs/ImageNet/PPLCNetV2/PPLCNetV2_base.yaml";

pub(super) fn register_all(registry: &mut Registry, repo_root: &Path) {
    register_shitu(registry, repo_root);
    register_cls(registry, repo_root);
}

fn register_shitu(registry: &mut Registry, repo_root: &Path) {
    registry.register_suite_info(SuiteInfo::new("ShiTu", SuiteKind::ShiTu, repo_root));

    let config_path = repo_root.join(SHITU_CONFIG);
    registry.register_model_info(
        ModelInfo::new(
            SHITU_MODEL,
            "ShiTu",
            &config_path,
            [Api::Train, Api::Export, Api::Infer, Api::Compression],
        )
        .with_auto_compression_config(&config_path),
    );

    // Checkpoints of this model are written under its architecture name.
    registry.register_alias(SHITU_MODEL, "RecModel");
}

fn register_cls(registry: &mut Registry, repo_root: &Path) {
    registry.register_suite_info(SuiteInfo::new("PaddleClas", SuiteKind::Cls, repo_root));

    let config_path = repo_root.join(CLS_CONFIG);
    registry.register_model_info(
        ModelInfo::new(CLS_MODEL, "PaddleClas", &config_path, Api::ALL)
            .with_auto_compression_config(&config_path),
    );
}
