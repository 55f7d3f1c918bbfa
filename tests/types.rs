use trs_induction::*;

fn op(name: &str, arity: u32) -> Operator {
    Operator::new(Some(name.to_string()), arity)
}

fn app(o: &Operator, args: Vec<Term>) -> Term {
    Term::apply(o.clone(), args).expect("well-formed application")
}

fn var(name: &str) -> Variable {
    Variable::new(Some(name.to_string()))
}

#[test]
fn application_arity_is_checked() {
    let a = app(&op("A", 0), vec![]);
    for arity in 0..4u32 {
        let f = op("F", arity);
        for n_args in 0..4usize {
            let args = vec![a.clone(); n_args];
            let result = Term::apply(f.clone(), args);
            if n_args == arity as usize {
                assert!(result.is_ok());
            } else {
                assert_eq!(
                    result,
                    Err(TermError::ArityMismatch {
                        op: f.clone(),
                        found: n_args,
                    })
                );
            }
        }
    }
}

#[test]
fn structural_equality() {
    let f = op("F", 2);
    let a = app(&op("A", 0), vec![]);
    let x = var("x");

    let t1 = app(&f, vec![Term::Variable(x.clone()), a.clone()]);
    let t2 = app(&f, vec![Term::Variable(x.clone()), a.clone()]);
    let t3 = app(&f, vec![a.clone(), Term::Variable(x.clone())]);
    // same name, same spelling, different identity
    let t4 = app(&f, vec![Term::Variable(var("x")), a.clone()]);

    assert_eq!(t1, t2);
    assert_ne!(t1, t3);
    assert_ne!(t1, t4);
}

#[test]
fn atoms_and_subterms_run_preorder() {
    let f = op("F", 2);
    let g = op("G", 1);
    let a = op("A", 0);
    let x = var("x");

    let a_t = app(&a, vec![]);
    let g_a = app(&g, vec![a_t.clone()]);
    let term = app(&f, vec![g_a.clone(), Term::Variable(x.clone())]);

    let atoms = term.atoms().collect::<Vec<_>>();
    assert_eq!(
        atoms,
        vec![
            Atom::from(f.clone()),
            Atom::from(g),
            Atom::from(a),
            Atom::from(x.clone()),
        ]
    );

    let subterms = term.subterms().collect::<Vec<_>>();
    assert_eq!(subterms, vec![&term, &g_a, &a_t, &Term::Variable(x)]);

    // restartable: a second pass sees the same sequence
    assert_eq!(term.atoms().collect::<Vec<_>>(), atoms);
    assert_eq!(term.size(), 4);
}

#[test]
fn term_variables_are_unique_in_order() {
    let f = op("F", 3);
    let x = var("x");
    let y = var("y");

    let term = app(
        &f,
        vec![
            Term::Variable(x.clone()),
            Term::Variable(y.clone()),
            Term::Variable(x.clone()),
        ],
    );
    assert_eq!(term.variables(), vec![x, y]);
}

#[test]
fn substitution_apply_is_strict() {
    let f = op("F", 2);
    let a = app(&op("A", 0), vec![]);
    let x = var("x");
    let y = var("y");

    let mut sub = Substitution::new();
    sub.insert(x.clone(), a.clone());

    let bound = app(&f, vec![Term::Variable(x.clone()), a.clone()]);
    assert_eq!(sub.apply(&bound), Ok(app(&f, vec![a.clone(), a.clone()])));

    let unbound = app(&f, vec![Term::Variable(x.clone()), Term::Variable(y.clone())]);
    assert_eq!(sub.apply(&unbound), Err(TermError::UnboundVariable(y)));

    // the engine-side substitute leaves unbound variables in place
    let half = unbound.substitute(&sub);
    assert_eq!(half.variables().len(), 1);
}

#[test]
fn unification_is_sound() {
    let f = op("F", 2);
    let g = op("G", 1);
    let a = app(&op("A", 0), vec![]);
    let b = app(&op("B", 0), vec![]);

    let cases = vec![
        (
            app(&f, vec![Term::Variable(var("x")), Term::Variable(var("y"))]),
            app(&f, vec![a.clone(), b.clone()]),
        ),
        (
            app(&f, vec![Term::Variable(var("x")), b.clone()]),
            app(&f, vec![a.clone(), Term::Variable(var("y"))]),
        ),
        (
            app(&g, vec![app(&g, vec![Term::Variable(var("x"))])]),
            app(&g, vec![Term::Variable(var("y"))]),
        ),
        (a.clone(), a.clone()),
    ];
    for (t1, t2) in cases {
        let sub = Term::unify(&t1, &t2)
            .unwrap_or_else(|| panic!("no unifier for {} and {}", t1, t2));
        assert_eq!(t1.substitute(&sub), t2.substitute(&sub));
    }
}

#[test]
fn unification_failure() {
    let f = op("F", 2);
    let g = op("G", 2);
    let a = app(&op("A", 0), vec![]);
    let b = app(&op("B", 0), vec![]);

    // different heads
    assert!(Term::unify(
        &app(&f, vec![a.clone(), b.clone()]),
        &app(&g, vec![a.clone(), b.clone()])
    )
    .is_none());
    // clashing constants
    assert!(Term::unify(&app(&f, vec![a.clone(), a.clone()]), &app(&f, vec![a, b])).is_none());
}

#[test]
fn match_asymmetry() {
    let f = op("F", 2);
    let g = op("G", 2);
    let a = app(&op("A", 0), vec![]);
    let b = app(&op("B", 0), vec![]);
    let x = var("x");

    // a ground term matches itself with the empty substitution
    let ground = app(&f, vec![a.clone(), b.clone()]);
    let sub = Term::pmatch(&ground, &ground).expect("ground self-match");
    assert!(sub.is_empty());

    // different head operators never match
    assert!(Term::pmatch(&ground, &app(&g, vec![a.clone(), b.clone()])).is_none());

    // only the pattern's variables may bind
    let pattern = app(&f, vec![Term::Variable(x.clone()), b.clone()]);
    let sub = Term::pmatch(&pattern, &ground).expect("pattern match");
    assert_eq!(sub.get(&x), Some(&a));
    assert!(Term::pmatch(&ground, &pattern).is_none());

    // but unification binds either side
    assert!(Term::unify(&ground, &pattern).is_some());
}

#[test]
fn rule_validation() {
    let f = op("F", 1);
    let a = app(&op("A", 0), vec![]);
    let x = var("x");
    let y = var("y");

    let f_x = app(&f, vec![Term::Variable(x.clone())]);

    assert!(Rule::new(f_x.clone(), vec![Term::Variable(x.clone())]).is_some());
    assert!(Rule::new(f_x.clone(), vec![a.clone(), Term::Variable(x)]).is_some());
    // lhs must be an application
    assert!(Rule::new(Term::Variable(y.clone()), vec![a]).is_none());
    // rhs cannot invent variables
    assert!(Rule::new(f_x.clone(), vec![Term::Variable(y)]).is_none());
    // rhs cannot be empty
    assert!(Rule::new(f_x, vec![]).is_none());
}

#[test]
fn rule_lone_rhs() {
    let f = op("F", 1);
    let a = app(&op("A", 0), vec![]);
    let b = app(&op("B", 0), vec![]);
    let f_a = app(&f, vec![a.clone()]);

    let single = Rule::new(f_a.clone(), vec![b.clone()]).unwrap();
    assert_eq!(single.rhs(), Some(&b));
    assert_eq!(single.len(), 1);

    let double = Rule::new(f_a, vec![a, b]).unwrap();
    assert_eq!(double.rhs(), None);
    assert_eq!(double.len(), 2);
}

#[test]
fn signature_views() {
    let f = op("F", 2);
    let a = op("A", 0);
    let x = var("x");

    let sig = Signature::new(vec![
        Atom::from(f.clone()),
        Atom::from(a.clone()),
        Atom::from(x.clone()),
    ]);

    assert_eq!(sig.operators(), vec![f.clone(), a.clone()]);
    assert_eq!(sig.variables(), vec![x.clone()]);
    assert_eq!(sig.terminals(), vec![Atom::from(a.clone()), Atom::from(x.clone())]);
    // atoms keep their insertion order
    assert_eq!(
        sig.atoms(),
        &[Atom::from(f), Atom::from(a), Atom::from(x)]
    );
}

#[test]
fn trs_signature_follows_rules() {
    let f = op("F", 1);
    let g = op("G", 1);
    let a = op("A", 0);
    let x = var("x");

    let rule = Rule::new(
        app(&f, vec![Term::Variable(x.clone())]),
        vec![app(&g, vec![Term::Variable(x.clone())])],
    )
    .unwrap();
    let mut trs = TRS::new(vec![rule]);

    for atom in [Atom::from(f), Atom::from(g.clone()), Atom::from(x)] {
        assert!(trs.signature().contains(&atom));
    }
    assert!(!trs.signature().contains(&Atom::from(a.clone())));

    let a_t = app(&a, vec![]);
    trs.push(Rule::new(app(&g, vec![a_t.clone()]), vec![a_t]).unwrap());
    assert!(trs.signature().contains(&Atom::from(a)));
    assert_eq!(trs.len(), 2);
    // G(A) = A contributes 3 subterms, F(x) = G(x) contributes 4
    assert_eq!(trs.size(), 7);
}

#[test]
fn removing_a_symbol_removes_dependent_rules() {
    let f = op("F", 1);
    let g = op("G", 1);
    let a = op("A", 0);
    let b = op("B", 0);
    let a_t = app(&a, vec![]);
    let b_t = app(&b, vec![]);
    let x = var("x");

    let mut trs = TRS::new(vec![
        Rule::new(
            app(&f, vec![Term::Variable(x.clone())]),
            vec![app(&g, vec![Term::Variable(x)])],
        )
        .unwrap(),
        Rule::new(app(&g, vec![a_t.clone()]), vec![a_t.clone()]).unwrap(),
        Rule::new(app(&f, vec![b_t.clone()]), vec![b_t]).unwrap(),
    ]);
    assert_eq!(trs.len(), 3);

    trs.remove_symbol(&Atom::from(a));
    assert_eq!(trs.len(), 2);
    assert!(!trs.signature().contains(&Atom::from(Operator::new(
        Some("A".to_string()),
        0
    ))));
    // rules not mentioning A survive
    assert!(trs
        .rules
        .iter()
        .all(|r| !r.atoms().contains(&Atom::from(Operator::new(Some("A".to_string()), 0)))));
}

#[test]
fn trs_rule_edits() {
    let f = op("F", 1);
    let a = app(&op("A", 0), vec![]);
    let b = app(&op("B", 0), vec![]);
    let f_a = app(&f, vec![a.clone()]);
    let f_b = app(&f, vec![b.clone()]);

    let r1 = Rule::new(f_a.clone(), vec![a.clone()]).unwrap();
    let r2 = Rule::new(f_b.clone(), vec![b.clone()]).unwrap();
    let r3 = Rule::new(f_a.clone(), vec![b.clone()]).unwrap();

    let mut trs = TRS::new(vec![r1.clone()]);
    trs.insert_idx(1, r2.clone()).unwrap();
    assert_eq!(trs.rules, vec![r1.clone(), r2.clone()]);

    trs.replace_idx(0, r3.clone()).unwrap();
    assert_eq!(trs.rules, vec![r3.clone(), r2.clone()]);

    let removed = trs.remove_idx(0).unwrap();
    assert_eq!(removed, r3);
    assert_eq!(trs.rules, vec![r2.clone()]);

    assert_eq!(
        trs.insert_idx(5, r1.clone()),
        Err(TRSError::InvalidIndex(5, 1))
    );
    assert_eq!(trs.remove_idx(1), Err(TRSError::InvalidIndex(1, 1)));
    assert_eq!(trs.replace_idx(1, r1), Err(TRSError::InvalidIndex(1, 1)));
}

#[test]
fn display_round_trip_shapes() {
    let dot = op(".", 2);
    let s = app(&op("S", 0), vec![]);
    let k = app(&op("K", 0), vec![]);

    let skk = app(&dot, vec![app(&dot, vec![s.clone(), k.clone()]), k.clone()]);
    assert_eq!(skk.to_string(), ".(.(S K) K)");
    assert_eq!(skk.pretty(), "S K K");

    let rule = Rule::new(app(&dot, vec![s, k.clone()]), vec![k]).unwrap();
    assert_eq!(rule.to_string(), ".(S K) = K");
    let trs = TRS::new(vec![rule]);
    assert_eq!(trs.to_string(), ".(S K) = K;");
}

#[test]
fn sample_term_stays_in_signature() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(7);
    let sig = Signature::new(vec![
        Atom::from(op("A", 0)),
        Atom::from(op("B", 0)),
        Atom::from(var("x")),
    ]);

    for _ in 0..10 {
        let term = sig.sample_term(&mut rng).expect("sampled term");
        assert!(term.atoms().all(|a| sig.contains(&a)));
    }
}
