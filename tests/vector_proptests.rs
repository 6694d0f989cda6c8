// Vector property test.
//
// Model: std::vec::Vec with the same operations applied, swap_remove
// included, so reordering is mirrored exactly.
// Invariants checked after every op:
//   len == model.len(), len <= capacity, contents equal element-wise,
//   capacity never shrinks.
use dense_dict::Vector;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(u32),
    Pop,
    SwapRemove(usize),
    Append(Vec<u32>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        2 => any::<usize>().prop_map(Op::SwapRemove),
        1 => proptest::collection::vec(any::<u32>(), 0..12).prop_map(Op::Append),
    ]
}

proptest! {
    #[test]
    fn prop_vector_matches_std_vec(
        init_cap in 1usize..=8,
        ops in proptest::collection::vec(arb_op(), 1..200),
    ) {
        let mut sut: Vector<u32> = Vector::with_capacity(init_cap);
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            let cap_before = sut.capacity();
            match op {
                Op::Push(x) => {
                    sut.push(x);
                    model.push(x);
                }
                Op::Pop => {
                    prop_assert_eq!(sut.pop(), model.pop());
                }
                Op::SwapRemove(raw) => {
                    if !model.is_empty() {
                        let i = raw % model.len();
                        prop_assert_eq!(sut.swap_remove(i), model.swap_remove(i));
                    }
                }
                Op::Append(items) => {
                    let back: Vector<u32> = items.iter().copied().collect();
                    sut.append(&back);
                    model.extend_from_slice(&items);
                    prop_assert_eq!(back.as_slice(), items.as_slice());
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.len() <= sut.capacity());
            prop_assert!(sut.capacity() >= cap_before);
            prop_assert_eq!(sut.as_slice(), model.as_slice());
        }
    }
}
