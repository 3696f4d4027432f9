use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;

use super::source::DataSource;
use super::version::DataVersion;
use crate::lang::RawDictionaryEntry;
use crate::mc::{Catalog, StrataTable};
use crate::syllable::{Categories, PartCategories, PartLabels, superscript};
use crate::{
    Converter, Dialect, Dictionary, Error, NotationRow, PartsCodec, PerDialect, Phonology, Result, SyllableCodec,
    ToneCodec, ToneTable,
};

/// Memoized loader of a data set.
///
/// The shared tables are built once into an immutable [`Phonology`];
/// dictionaries are loaded per dialect on demand. All accessors hand out
/// `Arc`s, so readers never block each other after loading.
pub struct PhonologyStore {
    source: Arc<dyn DataSource>,
    core: OnceCell<Arc<Phonology>>,
    dictionaries: PerDialect<OnceCell<Arc<Dictionary>>>,
}

impl PhonologyStore {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    fn with_source(source: Arc<dyn DataSource>) -> Self {
        PhonologyStore { source, core: OnceCell::new(), dictionaries: PerDialect::from_fn(|_| OnceCell::new()) }
    }

    /// Load the shared tables, or return them if already loaded. Concurrent
    /// callers wait for a single build.
    pub fn load(&self) -> Result<Arc<Phonology>> {
        self.core.get_or_try_init(|| build(self.source.as_ref()).map(Arc::new)).cloned()
    }

    /// Load the dictionary of `dialect`, loading the shared tables first.
    pub fn load_dictionary(&self, dialect: Dialect) -> Result<Arc<Dictionary>> {
        let phonology = self.load()?;
        self.dictionaries[dialect]
            .get_or_try_init(|| {
                let rows: Vec<RawDictionaryEntry> = decode(self.source.as_ref(), dialect.code())?;
                let dictionary = Dictionary::from_raw(dialect, rows, phonology.catalog());
                log::info!("loaded {} dictionary: {} entries", dialect, dictionary.len());
                Ok(Arc::new(dictionary))
            })
            .cloned()
    }

    /// The loaded shared tables.
    pub fn phonology(&self) -> Result<Arc<Phonology>> {
        self.core.get().cloned().ok_or_else(|| Error::NotLoaded("phonology data".to_string()))
    }

    /// A loaded dictionary.
    pub fn dictionary(&self, dialect: Dialect) -> Result<Arc<Dictionary>> {
        self.dictionaries[dialect].get().cloned().ok_or_else(|| Error::NotLoaded(format!("{dialect} dictionary")))
    }

    pub fn is_loaded(&self) -> bool {
        self.core.get().is_some()
    }

    /// An empty store over the same source, e.g. after a new data version.
    /// Handles taken from this store stay valid.
    pub fn reload(&self) -> PhonologyStore {
        Self::with_source(Arc::clone(&self.source))
    }
}

impl std::fmt::Debug for PhonologyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhonologyStore")
            .field("loaded", &self.is_loaded())
            .field("dictionaries", &Dialect::ALL.map(|d| self.dictionaries[d].get().is_some()))
            .finish()
    }
}

fn decode<T: DeserializeOwned>(source: &dyn DataSource, table: &str) -> Result<T> {
    let text = source.load_table(table)?;
    serde_json::from_str(&text).map_err(|source| Error::Malformed { table: table.to_string(), source })
}

fn build(source: &dyn DataSource) -> Result<Phonology> {
    let version = match source.load_version()? {
        Some(text) => {
            let version = DataVersion::parse(&text);
            if version.is_none() {
                log::warn!("unrecognized data version stamp {:?}", text.trim());
            }
            version
        }
        None => None,
    };

    let mut syllables: HashMap<String, Vec<NotationRow>> = decode(source, "syllables")?;
    let mut tones: HashMap<String, ToneTable> = decode(source, "tones")?;
    for info in tones.values_mut().flat_map(|table| table.values_mut()) {
        if let Some(number) = info.number.as_mut() {
            *number = superscript(number);
        }
    }
    let labels: Arc<PartLabels> = Arc::new(decode(source, "parts")?);
    let mut all_parts: HashMap<String, PartCategories> = decode(source, "all-parts")?;
    let catalog = Catalog::from_raw(decode(source, "MC")?);
    let strata = StrataTable::from_raw(decode(source, "strata")?);

    let categories = PerDialect::from_fn(|dialect| all_parts.remove(dialect.code()).unwrap_or_default());
    let codecs = PerDialect::try_from_fn(|dialect| {
        let rows = syllables.remove(dialect.code()).unwrap_or_else(|| {
            log::warn!("no syllable table for {dialect}");
            Vec::new()
        });
        let tone_table = tones.remove(dialect.code()).unwrap_or_default();
        Ok::<_, Error>(SyllableCodec::new(
            ToneCodec::new(dialect, tone_table)?,
            Converter::new(dialect, rows)?,
            Categories::new(categories[dialect].clone()),
        ))
    })?;
    let parts = PerDialect::from_fn(|dialect| {
        let tones = codecs[dialect].tones();
        let names = tones
            .ordinals()
            .filter_map(|ordinal| Some((ordinal.to_string(), tones.info(ordinal)?.name.clone())))
            .collect();
        PartsCodec::new(dialect, Arc::clone(&labels), categories[dialect].clone(), names)
    });

    log::info!(
        "loaded phonology data{}: {} MC entries",
        version.map(|v| format!(" ({v})")).unwrap_or_default(),
        catalog.len()
    );
    Ok(Phonology::new(version, codecs, parts, catalog, strata))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::MemorySource;

    const SYLLABLES: &str = r#"{
        "FG": [
            {"tuple": ["t", "", "a", "n"], "pinyin": "tan", "ipaRaw": "tan", "ipaStrict": "tan"},
            {"tuple": ["h", "", "a", "n"], "pinyin": "han", "ipaRaw": "han", "ipaStrict": "han"},
            {"tuple": ["c", "", "e", "n"], "pinyin": "cen", "ipaRaw": "tɕɛn", "ipaStrict": "t͡ɕɛn"}
        ],
        "PM": [
            {"tuple": ["t", "", "a", "n"], "pinyin": "tan", "ipaRaw": "tʰan", "ipaStrict": "tʰan"}
        ]
    }"#;
    const TONES: &str = r#"{
        "FG": {"1": {"name": "陰平", "diacritic": "̄", "letter": "˧˨", "number": "32"}},
        "PM": {"1": {"name": "陰平", "diacritic": "̄", "letter": "˥", "number": "55"}}
    }"#;
    const MC: &str = r#"{
        "1": {"字數": 3, "MC": {"字": "灘", "聲母": "透", "清濁": "次清", "組": "端", "攝": "山", "韻系": "寒",
              "等": "一", "呼": "開", "聲調": "平"}, "reflex": {"FG": "tan1", "PM": "tan1"}}
    }"#;

    fn memory_source() -> MemorySource {
        MemorySource::new()
            .with_version("2024 年 3 月 9 日")
            .with_table("syllables", SYLLABLES)
            .with_table("tones", TONES)
            .with_table("parts", r#"{"pinyin": {"介音": {"": "無"}}}"#)
            .with_table("all-parts", r#"{"FG": {"聲母": ["t", "c", "h"]}}"#)
            .with_table("MC", MC)
            .with_table("strata", r#"{"FG": {"1": [["白", "han1"]]}}"#)
            .with_table("FG", r#"[{"字頭": "灘", "層": "白", "小韻號": 1}, {"字頭": "攤", "記錄讀音": "tan1"}]"#)
    }

    #[test]
    fn queries_fail_before_loading() {
        let store = PhonologyStore::new(memory_source());
        assert!(matches!(store.phonology(), Err(Error::NotLoaded(_))));
        assert!(matches!(store.dictionary(Dialect::Fg), Err(Error::NotLoaded(_))));
        assert!(!store.is_loaded());
    }

    #[test]
    fn load_builds_codecs_and_catalog() {
        let store = PhonologyStore::new(memory_source());
        let phonology = store.load().unwrap();
        assert!(Arc::ptr_eq(&phonology, &store.phonology().unwrap()));

        assert_eq!(phonology.version().map(|v| v.to_string()).as_deref(), Some("2024 年 3 月 9 日"));
        assert_eq!(phonology.catalog().len(), 1);
        assert_eq!(phonology.syllable(Dialect::Fg).tones().info("1").unwrap().number.as_deref(), Some("³²"));
        assert_eq!(phonology.syllable(Dialect::Pm).converter().rows().len(), 1);
        assert!(phonology.syllable(Dialect::Sw).converter().rows().is_empty());
        assert_eq!(phonology.reflex_map(1, Dialect::Fg).unwrap().len(), 2);
    }

    #[test]
    fn dictionaries_load_after_core() {
        let store = PhonologyStore::new(memory_source());
        let fg = store.load_dictionary(Dialect::Fg).unwrap();
        assert!(store.is_loaded());
        assert_eq!(fg.len(), 2);
        assert_eq!(fg.entry_at(0).unwrap().pronunciation(), Some("han1"));
        assert!(Arc::ptr_eq(&fg, &store.dictionary(Dialect::Fg).unwrap()));

        let err = store.load_dictionary(Dialect::Gc).unwrap_err();
        assert!(err.is_load_failure());
        assert!(store.dictionary(Dialect::Gc).is_err());
    }

    #[test]
    fn malformed_table_is_reported_and_retriable() {
        let store = PhonologyStore::new(memory_source().with_table("MC", "{"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Malformed { ref table, .. } if table == "MC"));
        assert!(!store.is_loaded());
        assert!(store.load().is_err());
    }

    #[test]
    fn duplicate_syllables_fail_the_load() {
        let syllables = r#"{"FG": [
            {"tuple": ["t", "", "a", "n"], "pinyin": "tan", "ipaRaw": "tan", "ipaStrict": "tan"},
            {"tuple": ["d", "", "a", "n"], "pinyin": "dan", "ipaRaw": "tan", "ipaStrict": "tan"}
        ]}"#;
        let store = PhonologyStore::new(memory_source().with_table("syllables", syllables));
        assert!(matches!(store.load(), Err(Error::DuplicateValue { column: "ipaRaw", .. })));
    }

    struct CountingSource {
        inner: MemorySource,
        reads: AtomicUsize,
        fail_first: bool,
    }

    impl DataSource for CountingSource {
        fn load_table(&self, name: &str) -> Result<String> {
            let reads = self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && reads == 0 {
                return Err(Error::MissingTable { table: name.to_string() });
            }
            self.inner.load_table(name)
        }
    }

    #[test]
    fn concurrent_loads_build_once() {
        let source = Arc::new(CountingSource { inner: memory_source(), reads: AtomicUsize::new(0), fail_first: false });
        let store = Arc::new(PhonologyStore::with_source(source.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.load().map(|p| Arc::as_ptr(&p) as usize))
            })
            .collect();
        let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();

        assert!(pointers.windows(2).all(|pair| pair[0] == pair[1]));
        // syllables, tones, parts, all-parts, MC, strata
        assert_eq!(source.reads.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn failed_load_can_be_retried() {
        let source = Arc::new(CountingSource { inner: memory_source(), reads: AtomicUsize::new(0), fail_first: true });
        let store = PhonologyStore::with_source(source);
        assert!(store.load().unwrap_err().is_load_failure());
        assert!(store.load().is_ok());
    }

    #[test]
    fn reload_starts_empty() {
        let store = PhonologyStore::new(memory_source());
        let old = store.load().unwrap();
        let fresh = store.reload();
        assert!(!fresh.is_loaded());
        let new = fresh.load().unwrap();
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(old.catalog().len(), new.catalog().len());
    }
}
