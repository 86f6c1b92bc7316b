use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xid_core::models::{AccountId, PriceTier};
use xid_core::{transact, MemStore, PeerTree, Registry, RegistryConfig, TldConfig};

fn addresses(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("epixnet-peer-{i:05}")).collect()
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_root");
    for n in [1usize, 16, 256, 4096] {
        let peers = addresses(n);
        group.bench_with_input(BenchmarkId::new("compute", n), &peers, |b, peers| {
            b.iter(|| PeerTree::new(black_box(peers.clone())).root_hex("epix", "alice"))
        });

        let tree = PeerTree::new(peers.clone());
        let target = peers[n / 2].clone();
        let root = tree.root_hex("epix", "alice");
        group.bench_with_input(BenchmarkId::new("prove_verify", n), &target, |b, target| {
            b.iter(|| {
                let proof = tree.generate_proof(black_box(target)).unwrap();
                proof.verify("epix", "alice", &root).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_set_peer(c: &mut Criterion) {
    let authority = AccountId::new([0xaa; 20]);
    let owner = AccountId::new([1; 20]);
    let registry = Registry::new(RegistryConfig::with_authority(authority)).unwrap();
    let mut store = MemStore::new();
    transact(&mut store, 1, |ctx| {
        registry.create_tld(ctx, &authority, TldConfig::new("epix", true, vec![PriceTier::new(u32::MAX, 0)]))?;
        registry.register(ctx, &owner, "epix", "alice")?;
        for address in addresses(64) {
            registry.set_peer(ctx, &owner, "epix", "alice", &address, "")?;
        }
        Ok(())
    })
    .unwrap();

    c.bench_function("set_peer_with_64_active", |b| {
        b.iter(|| {
            transact(&mut store.clone(), 2, |ctx| {
                registry.set_peer(ctx, &owner, "epix", "alice", "epixnet-peer-new", "bench")
            })
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_tree, bench_set_peer);
criterion_main!(benches);
