#![cfg(test)]

use symkey::{
    model::{CompilationBuilder, MemCompilation, SymbolId},
    Frame, Location, Span, SymbolKey,
};

pub const SOURCE: &str = "geo/point.src";

#[allow(dead_code)]
pub fn enable_debug_logs() {
    symkey::logger::try_init(log::LevelFilter::Debug);
}

/// A small compilation exercising every symbol category, plus handles to
/// the symbols the tests encode.
#[allow(dead_code)]
pub struct Sample {
    pub compilation: MemCompilation,
    pub global: SymbolId,
    pub geo: SymbolId,
    pub point: SymbolId,
    pub x: SymbolId,
    pub name: SymbolId,
    pub item: SymbolId,
    pub list: SymbolId,
    pub t: SymbolId,
    pub list_of_point: SymbolId,
    pub point_array: SymbolId,
    pub int_pointer: SymbolId,
    pub pair: SymbolId,
    pub anon: SymbolId,
    pub map: SymbolId,
    pub u: SymbolId,
    pub items: SymbolId,
    pub tmp: SymbolId,
}

pub fn sample() -> Sample {
    sample_with(0, true)
}

/// `padding` declares unrelated namespaces first so that every symbol gets a
/// different id than in another sample; `with_sources` controls whether the
/// source file is part of the compilation.
pub fn sample_with(padding: usize, with_sources: bool) -> Sample {
    let mut b = CompilationBuilder::new();
    if with_sources {
        b.file(SOURCE);
    }
    for i in 0..padding {
        b.namespace(b.global(), &format!("pad{}", i));
    }

    let global = b.global();
    let geo = b.namespace(global, "geo");
    let point = b.class(geo, "Point", &[]);
    let x = b.field(point, "x", b.int(), at(2, 5));
    let name = b.property(point, "Name", b.string(), true, at(3, 5));
    let item = b.indexer(point, "Item", b.string(), &[("index", b.int())]);

    let list = b.class(geo, "List", &["T"]);
    let t = b.type_parameters(list)[0];
    let list_of_point = b.construct(list, &[point]).unwrap();
    let point_array = b.array(point, 1);
    let int_pointer = b.pointer(b.int());

    let pair = b
        .tuple(
            &[b.int(), b.string()],
            &[Some("a".to_string()), Some("b".to_string())],
            &[Location::None, Location::None],
        )
        .unwrap();
    let anon = b
        .anonymous(
            &[b.int(), b.string()],
            &["X".to_string(), "Y".to_string()],
            &[false, false],
            &[at(10, 9), at(10, 16)],
        )
        .unwrap();

    let map = b.method(point, "map", &["U"]);
    let u = b.type_parameters(map)[0];
    let u_array = b.array(u, 1);
    let list_of_u = b.construct(list, &[u]).unwrap();
    let items = b.parameter(map, "items", u_array);
    b.parameter(map, "into", list_of_u);
    b.local(map, "tmp", b.int());
    let tmp = b.local(map, "tmp", b.string());

    Sample {
        compilation: b.finish(),
        global,
        geo,
        point,
        x,
        name,
        item,
        list,
        t,
        list_of_point,
        point_array,
        int_pointer,
        pair,
        anon,
        map,
        u,
        items,
        tmp,
    }
}

#[allow(dead_code)]
pub fn at(line: usize, col: usize) -> Location {
    Location::source(SOURCE, Span::on_line(line, col, line * 100 + col, 1))
}

/// Every symbol handle of a sample, in a fixed order.
#[allow(dead_code)]
pub fn handles(s: &Sample) -> Vec<SymbolId> {
    vec![
        s.global,
        s.geo,
        s.point,
        s.x,
        s.name,
        s.item,
        s.list,
        s.t,
        s.list_of_point,
        s.point_array,
        s.int_pointer,
        s.pair,
        s.anon,
        s.map,
        s.u,
        s.items,
        s.tmp,
    ]
}

/// Replaces every occurrence of the string `from` in a key.
#[allow(dead_code)]
pub fn rename(key: &SymbolKey, from: &str, to: &str) -> SymbolKey {
    let frames = key
        .frames()
        .iter()
        .map(|frame| match frame {
            Frame::Str(Some(s)) if s == from => Frame::Str(Some(to.to_string())),
            other => other.clone(),
        })
        .collect();
    SymbolKey::from_frames(frames)
}
