use chrono::Utc;
use rand::Rng;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// JSONドキュメント1つに保存されるレコード
///
/// IDは初回保存時にストアが割り当てる。
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn record_id(&self) -> Option<&str>;

    fn assign_record_id(&mut self, id: String);
}

/// IDの生成規則 `<PREFIX>_<epochミリ秒>_<乱数>`
#[derive(Debug, Clone, Copy)]
pub struct IdFormat {
    pub prefix: &'static str,
    pub random_range: u32,
}

impl IdFormat {
    pub const fn new(prefix: &'static str, random_range: u32) -> Self {
        Self {
            prefix,
            random_range,
        }
    }

    /// 新しいIDを生成する（一意性は確率的）
    pub fn generate(&self) -> String {
        let random = rand::thread_rng().gen_range(0..self.random_range.max(1));
        format!("{}_{}_{}", self.prefix, Utc::now().timestamp_millis(), random)
    }
}

/// エンティティ種別ごとのJSONファイルストア
///
/// 起動時にファイル全体をメモリに読み込み、変更のたびにファイル全体を書き戻す。
/// 書き戻しはロックを保持したまま行うため、同一プロセス内の書き込みは直列化される。
pub struct JsonStore<T> {
    path: PathBuf,
    id_format: IdFormat,
    records: Mutex<BTreeMap<String, T>>,
}

impl<T: Record> JsonStore<T> {
    /// ファイルを読み込んでストアを開く
    ///
    /// ファイルが存在しない・空・壊れている場合は空のストアとして扱う。
    pub async fn open(path: impl Into<PathBuf>, id_format: IdFormat) -> Self {
        let path = path.into();
        let records = load(&path).await;

        Self {
            path,
            id_format,
            records: Mutex::new(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records.lock().await.get(id).cloned()
    }

    pub async fn values(&self) -> Vec<T> {
        self.records.lock().await.values().cloned().collect()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.records
            .lock()
            .await
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    pub async fn find<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.records
            .lock()
            .await
            .values()
            .find(|record| predicate(record))
            .cloned()
    }

    /// 保存する（upsert）
    ///
    /// IDが未割当なら、ストア内で未使用のIDを生成して割り当てる。
    /// 書き込みに失敗した場合、メモリ上のストアもレコードのIDも変更しない。
    pub async fn save(&self, record: &mut T) -> Result<()> {
        let mut records = self.records.lock().await;

        let (id, assigned) = match record.record_id() {
            Some(id) => (id.to_string(), false),
            None => {
                let mut id = self.id_format.generate();
                while records.contains_key(&id) {
                    id = self.id_format.generate();
                }
                (id, true)
            }
        };

        let mut stored = record.clone();
        if assigned {
            stored.assign_record_id(id.clone());
        }

        let mut next = records.clone();
        next.insert(id.clone(), stored);
        persist(&self.path, &next).await?;
        *records = next;

        if assigned {
            record.assign_record_id(id);
        }
        Ok(())
    }

    /// 既存レコードを置き換える
    ///
    /// IDが未割当または未登録の場合は `Ok(false)`。
    pub async fn update(&self, record: &T) -> Result<bool> {
        let Some(id) = record.record_id() else {
            return Ok(false);
        };

        let mut records = self.records.lock().await;
        if !records.contains_key(id) {
            return Ok(false);
        }

        let mut next = records.clone();
        next.insert(id.to_string(), record.clone());
        persist(&self.path, &next).await?;
        *records = next;
        Ok(true)
    }

    /// レコードを削除する
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut records = self.records.lock().await;
        if !records.contains_key(id) {
            return Ok(false);
        }

        let mut next = records.clone();
        next.remove(id);
        persist(&self.path, &next).await?;
        *records = next;
        Ok(true)
    }
}

async fn load<T: Record>(path: &Path) -> BTreeMap<String, T> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Store {} does not exist yet, starting empty", path.display());
            return BTreeMap::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read store {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };

    if json.trim().is_empty() {
        return BTreeMap::new();
    }

    // レコード単位で読み込み、壊れたレコードだけを読み飛ばす
    let entries = match serde_json::from_str::<Option<BTreeMap<String, serde_json::Value>>>(&json)
    {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to parse store {}: {}", path.display(), e);
            back_up(path).await;
            return BTreeMap::new();
        }
    };

    let mut records = BTreeMap::new();
    let mut skipped = 0;
    for (id, value) in entries {
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                records.insert(id, record);
            }
            Err(e) => {
                tracing::warn!("Skipping record {} in {}: {}", id, path.display(), e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        back_up(path).await;
    }
    records
}

/// 次の書き戻しで失われる内容を `<file>.bak` に退避する
async fn back_up(path: &Path) {
    let backup = backup_path(path);
    match tokio::fs::copy(path, &backup).await {
        Ok(_) => tracing::warn!("Kept a copy of {} at {}", path.display(), backup.display()),
        Err(e) => tracing::warn!("Failed to back up {}: {}", path.display(), e),
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

async fn persist<T: Record>(path: &Path, records: &BTreeMap<String, T>) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, json).await.map_err(|e| {
        tracing::warn!("Failed to write store {}: {}", path.display(), e);
        e
    })?;

    Ok(())
}
