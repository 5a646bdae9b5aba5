use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

/// 查无股票时使用的占位名称
pub const UNKNOWN_NAME: &str = "未知";

/// 股票基础信息：代码、名称与所属族群（一支股票可属多个族群）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub instrument_id: String,
    pub display_name: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// 静态股票参照表，文件加载一次、运行期只读
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalog {
    infos: Vec<InstrumentInfo>,
    index: HashMap<String, usize>,
}

impl InstrumentCatalog {
    pub fn from_infos(infos: Vec<InstrumentInfo>) -> Self {
        let mut index = HashMap::with_capacity(infos.len());
        for (i, info) in infos.iter().enumerate() {
            index.entry(info.instrument_id.clone()).or_insert(i);
        }
        Self { infos, index }
    }

    /// 从 JSON 文件加载股票清单
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取股票清单失败: {}", path.display()))?;
        let infos: Vec<InstrumentInfo> = serde_json::from_str(&content)
            .with_context(|| format!("解析股票清单失败: {}", path.display()))?;
        info!("股票清单载入 {} 笔", infos.len());
        Ok(Self::from_infos(infos))
    }

    pub fn contains(&self, instrument_id: &str) -> bool {
        self.index.contains_key(instrument_id)
    }

    /// 股票名称，查无返回占位名
    pub fn display_name(&self, instrument_id: &str) -> &str {
        self.index
            .get(instrument_id)
            .map(|&i| self.infos[i].display_name.as_str())
            .unwrap_or(UNKNOWN_NAME)
    }

    /// 全部股票代码，保持清单文件中的顺序
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.infos.iter().map(|i| i.instrument_id.as_str())
    }

    /// 全部（股票, 族群）隶属关系，保持清单顺序，一对多展开
    pub fn memberships(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for info in &self.infos {
            for category in &info.categories {
                pairs.push((info.instrument_id.as_str(), category.as_str()));
            }
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }
}
