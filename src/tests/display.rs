use crate::{
    parse_response, AnalysisPayload, AnchorId, BoundDiscourse, CbEvidence, CenteringResult,
    DiscourseDisplay, MatchOptions, Relation,
};

fn study() -> BoundDiscourse {
    let body = include_bytes!("../../fixtures/study.json");
    BoundDiscourse::bind(&parse_response(body).unwrap(), MatchOptions::default())
}

#[test]
fn study_roles_through_second_sentence() {
    let discourse = study();
    insta::assert_snapshot!(DiscourseDisplay::new(&discourse).through(1).to_string(), @r"
U₁  John  has  been  acting  quite  odd.
    ╰Cf
U₂  He  called  up  Mike  yesterday.
    ╰Cb
        ╰Cf
                    ╰Cf
");
}

#[test]
fn study_relations_hidden_until_target_is_shown() {
    let discourse = study();
    insta::assert_snapshot!(DiscourseDisplay::new(&discourse).through(1).with_relations().to_string(), @r"
U₁  John  has  been  acting  quite  odd.
    ╰Cf
      └─>word-1-0
U₂  He  called  up  Mike  yesterday.
    ╰Cb
        ╰Cf
                    ╰Cf
");
}

#[test]
fn study_complete_with_relations() {
    let discourse = study();
    insta::assert_snapshot!(DiscourseDisplay::new(&discourse).with_relations().to_string(), @r"
U₁  John  has  been  acting  quite  odd.
    ╰Cf
      └─>word-1-0
U₂  He  called  up  Mike  yesterday.
    ╰Cb
        ╰Cf
                    ╰Cf
                      └─>word-2-0
                      └─>word-2-4
U₃  Mike  was  studying  for  his  driver's  test.
    ╰Cb
      └─>word-3-0
                              ╰Cf
U₄  He  was  annoyed  by  John's  call.
    ╰Cb
                          ╰Cf
                                  ╰Cf
");
}

#[test]
fn lexical_evidence_leaves_pronouns_as_cf() {
    let body = include_bytes!("../../fixtures/study.json");
    let options = MatchOptions {
        cb_evidence: CbEvidence::Lexical,
        ..MatchOptions::default()
    };
    let discourse = BoundDiscourse::bind(&parse_response(body).unwrap(), options);
    insta::assert_snapshot!(DiscourseDisplay::new(&discourse).through(1).to_string(), @r"
U₁  John  has  been  acting  quite  odd.
    ╰Cf
U₂  He  called  up  Mike  yesterday.
    ╰Cf
        ╰Cf
                    ╰Cf
");
}

#[test]
fn sentence_relations_and_unmarked_sources() {
    let payload = AnalysisPayload::supplied(
        vec![
            CenteringResult::new("Jill caught a ball.", None, &["Jill"]),
            CenteringResult::new("She tossed it.", Some("Jill"), &["She", "it"]),
        ],
        vec![
            Relation::downward(AnchorId::sentence(0), AnchorId::sentence(1)),
            Relation::downward(AnchorId::word(0, 3), AnchorId::word(1, 2)),
        ],
    );
    let discourse = BoundDiscourse::bind(&payload, MatchOptions::default());
    insta::assert_snapshot!(DiscourseDisplay::new(&discourse).with_relations().to_string(), @r"
U₁  Jill  caught  a  ball.
└─>sentence-1
    ╰Cf
                     ╰
                       └─>word-1-2
U₂  She  tossed  it.
    ╰Cf
                 ╰Cf
");
}
