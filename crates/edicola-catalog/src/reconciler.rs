//! Catalog reconciliation
//!
//! Merges the on-chain magazine list with off-chain content documents into
//! the catalog view: released issues sorted newest-first, unreleased issues,
//! and the latest release. Off-chain content is merged eagerly for the
//! latest issue only (and only for reader roles); everything else merges
//! lazily per card so one catalog load cannot fan out into a store read per
//! magazine.

use edicola_bridge::MagazineReader;
use edicola_store::ContentStore;
use edicola_types::{Address, MagazineRecord, Result, Role};
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

/// The merged, role-independent catalog view
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Released issues, newest first
    pub released: Vec<MagazineRecord>,
    /// Created but not yet released
    pub unreleased: Vec<MagazineRecord>,
    /// Most recently released issue, if any
    pub latest: Option<MagazineRecord>,
}

/// Builds catalog views from the chain and the content store
pub struct Reconciler {
    reader: Arc<dyn MagazineReader>,
    store: Arc<dyn ContentStore>,
    /// First index to read, bounding catalog cost as it grows
    start_offset: u64,
}

impl Reconciler {
    pub fn new(
        reader: Arc<dyn MagazineReader>,
        store: Arc<dyn ContentStore>,
        start_offset: u64,
    ) -> Self {
        Self {
            reader,
            store,
            start_offset,
        }
    }

    /// Fetch, partition, and order the catalog.
    ///
    /// For reader roles the latest issue's content is merged eagerly; a
    /// missing document or an unreachable store leaves its fields empty and
    /// never fails the build.
    pub async fn build(&self, role: Role) -> Result<Catalog> {
        let count = self.reader.count_magazines().await?;
        let mut records = Vec::with_capacity(count.saturating_sub(self.start_offset) as usize);
        for index in self.start_offset..count {
            records.push(self.reader.magazine_at(index).await?);
        }

        let (mut released, unreleased): (Vec<_>, Vec<_>) =
            records.into_iter().partition(MagazineRecord::is_released);
        released.sort_by(|a, b| b.release_date.cmp(&a.release_date));

        let mut latest = released.first().cloned();
        if role.is_reader() {
            if let Some(latest) = latest.as_mut() {
                self.merge_content_quietly(latest).await;
            }
        }

        Ok(Catalog {
            released,
            unreleased,
            latest,
        })
    }

    /// Merge the off-chain content for one record, on demand.
    ///
    /// A missing document leaves the fields empty; only an unreachable
    /// store is an error.
    pub async fn merge_content_for(&self, record: &mut MagazineRecord) -> Result<()> {
        if let Some(doc) = self.store.find(&record.address).await? {
            record.merge_content(doc);
        }
        Ok(())
    }

    /// Merge content for several records concurrently; each touches a
    /// disjoint key, so completion order does not matter.
    pub async fn merge_content_many(&self, records: &mut [MagazineRecord]) -> Result<()> {
        let docs = join_all(
            records
                .iter()
                .map(|record| self.store.find(&record.address)),
        )
        .await;
        for (record, doc) in records.iter_mut().zip(docs) {
            if let Some(doc) = doc? {
                record.merge_content(doc);
            }
        }
        Ok(())
    }

    /// The signer's purchased issues, resolved to full on-chain records
    pub async fn customer_magazines(&self, signer: &Address) -> Result<Vec<MagazineRecord>> {
        let addresses = self.reader.customer_magazine_addresses(signer).await?;
        let lookups = join_all(
            addresses
                .iter()
                .map(|address| self.reader.magazine_by_address(address)),
        )
        .await;
        let mut magazines = Vec::with_capacity(addresses.len());
        for looked_up in lookups {
            if let Some(record) = looked_up? {
                magazines.push(record);
            }
        }
        Ok(magazines)
    }

    async fn merge_content_quietly(&self, record: &mut MagazineRecord) {
        match self.store.find(&record.address).await {
            Ok(Some(doc)) => record.merge_content(doc),
            Ok(None) => {}
            // metadata only; the catalog still renders without it
            Err(err) => warn!(address = %record.address, %err, "content merge skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edicola_store::MemoryStore;
    use edicola_types::ContentDocument;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn record(n: u8, release_date: u64) -> MagazineRecord {
        MagazineRecord::on_chain(addr(n), format!("Issue {n}"), release_date)
    }

    /// Fixed on-chain state for reconciler tests
    struct FixtureReader {
        magazines: Vec<MagazineRecord>,
        purchases: Vec<Address>,
    }

    #[async_trait::async_trait]
    impl MagazineReader for FixtureReader {
        async fn count_magazines(&self) -> Result<u64> {
            Ok(self.magazines.len() as u64)
        }

        async fn magazine_at(&self, index: u64) -> Result<MagazineRecord> {
            Ok(self.magazines[index as usize].clone())
        }

        async fn magazine_by_address(
            &self,
            address: &Address,
        ) -> Result<Option<MagazineRecord>> {
            Ok(self
                .magazines
                .iter()
                .find(|m| &m.address == address)
                .cloned())
        }

        async fn customer_magazine_addresses(&self, _signer: &Address) -> Result<Vec<Address>> {
            Ok(self.purchases.clone())
        }
    }

    fn reconciler_with(
        magazines: Vec<MagazineRecord>,
        store: Arc<MemoryStore>,
    ) -> Reconciler {
        Reconciler::new(
            Arc::new(FixtureReader {
                magazines,
                purchases: Vec::new(),
            }),
            store,
            0,
        )
    }

    #[tokio::test]
    async fn test_partition_sort_and_latest() {
        let store = Arc::new(MemoryStore::new());
        let reconciler =
            reconciler_with(vec![record(1, 0), record(2, 100), record(3, 50)], store);

        let catalog = reconciler.build(Role::Administrator).await.unwrap();
        assert_eq!(catalog.unreleased, vec![record(1, 0)]);
        assert_eq!(catalog.released, vec![record(2, 100), record(3, 50)]);
        assert_eq!(catalog.latest, Some(record(2, 100)));
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = reconciler_with(Vec::new(), store);
        let catalog = reconciler.build(Role::Visitor).await.unwrap();
        assert!(catalog.released.is_empty());
        assert!(catalog.unreleased.is_empty());
        assert_eq!(catalog.latest, None);
    }

    #[tokio::test]
    async fn test_latest_content_merged_for_reader_roles_only() {
        let store = Arc::new(MemoryStore::new());
        store
            .update(
                &addr(2),
                ContentDocument {
                    cover: "cid-cover?filename=c.png".into(),
                    content: "cid-pdf?filename=n2.pdf".into(),
                    summary: "the latest".into(),
                },
            )
            .await
            .unwrap();

        let magazines = vec![record(1, 0), record(2, 100), record(3, 50)];
        let reconciler = reconciler_with(magazines.clone(), store.clone());

        let customer_view = reconciler.build(Role::Customer).await.unwrap();
        assert_eq!(customer_view.latest.as_ref().unwrap().summary, "the latest");
        // the rest of the released list stays unmerged until asked per card
        assert!(customer_view.released[1].content_missing());

        let admin_view = reconciler_with(magazines, store)
            .build(Role::Administrator)
            .await
            .unwrap();
        assert!(admin_view.latest.as_ref().unwrap().content_missing());
    }

    #[tokio::test]
    async fn test_missing_document_does_not_fail_build() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = reconciler_with(vec![record(2, 100)], store);
        let catalog = reconciler.build(Role::Visitor).await.unwrap();
        let latest = catalog.latest.unwrap();
        assert_eq!(latest.cover, "");
        assert_eq!(latest.content, "");
        assert_eq!(latest.summary, "");
    }

    #[tokio::test]
    async fn test_start_offset_bounds_reads() {
        let store = Arc::new(MemoryStore::new());
        let reader = Arc::new(FixtureReader {
            magazines: vec![record(1, 10), record(2, 20), record(3, 30)],
            purchases: Vec::new(),
        });
        let reconciler = Reconciler::new(reader, store, 2);
        let catalog = reconciler.build(Role::Visitor).await.unwrap();
        assert_eq!(catalog.released, vec![record(3, 30)]);
    }

    #[tokio::test]
    async fn test_lazy_merge_many() {
        let store = Arc::new(MemoryStore::new());
        store
            .update(
                &addr(3),
                ContentDocument {
                    cover: String::new(),
                    content: String::new(),
                    summary: "three".into(),
                },
            )
            .await
            .unwrap();
        let reconciler = reconciler_with(Vec::new(), store);

        let mut cards = vec![record(2, 100), record(3, 50)];
        reconciler.merge_content_many(&mut cards).await.unwrap();
        assert!(cards[0].content_missing());
        assert_eq!(cards[1].summary, "three");
    }

    #[tokio::test]
    async fn test_customer_magazines_resolve_records() {
        let store = Arc::new(MemoryStore::new());
        let reader = Arc::new(FixtureReader {
            magazines: vec![record(1, 10), record(2, 20)],
            purchases: vec![addr(2)],
        });
        let reconciler = Reconciler::new(reader, store, 0);
        let mine = reconciler.customer_magazines(&addr(9)).await.unwrap();
        assert_eq!(mine, vec![record(2, 20)]);
    }

    #[tokio::test]
    async fn test_create_release_read_roundtrip() {
        // create: empty document keyed by the new address
        let store = Arc::new(MemoryStore::new());
        let address = addr(5);
        store.create_empty(&address).await.unwrap();

        // release: on-chain timestamp set, then the caller writes content
        let released_at = 1_733_011_200_000u64;
        let doc = ContentDocument {
            cover: "cid-cover?filename=cover5.png".into(),
            content: "cid-pdf?filename=issue5.pdf".into(),
            summary: "issue five".into(),
        };
        store.update(&address, doc.clone()).await.unwrap();

        // read back by address and merge
        let reconciler = reconciler_with(vec![record(5, released_at)], store);
        let mut found = reconciler
            .reader
            .magazine_by_address(&address)
            .await
            .unwrap()
            .unwrap();
        reconciler.merge_content_for(&mut found).await.unwrap();

        assert_eq!(found.release_date, released_at);
        assert_eq!(found.cover, doc.cover);
        assert_eq!(found.content, doc.content);
        assert_eq!(found.summary, doc.summary);
    }
}
